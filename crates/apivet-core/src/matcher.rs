//! Matching manifests against the rule table

use crate::error::Result;
use crate::finding::Finding;
use crate::rules::{Rule, RuleTable};
use crate::stub::{Stub, decode_stubs};

/// Find the rule for a stub; the first matching rule in table order wins.
///
/// For a wildcard rule the returned copy carries the stub's kind.
pub fn match_rule(stub: &Stub, rules: &[Rule]) -> Option<Rule> {
    let rule = rules
        .iter()
        .find(|rule| rule.matches(&stub.api_version, &stub.kind))?;

    let mut rule = rule.clone();
    if rule.is_wildcard() {
        rule.kind = stub.kind.clone();
    }
    Some(rule)
}

impl RuleTable {
    pub fn matching(&self, stub: &Stub) -> Option<Rule> {
        match_rule(stub, self.rules())
    }

    /// Findings for every stub (and nested item) that matches a rule
    pub fn findings_for(&self, stubs: Vec<Stub>) -> Vec<Finding> {
        stubs
            .into_iter()
            .flat_map(Stub::flatten)
            .filter_map(|stub| self.matching(&stub).map(|rule| Finding::new(&stub, rule)))
            .collect()
    }
}

/// Decode `data` and return a finding for every catalogued object in it.
///
/// Findings are not evaluated yet; that happens when a report is filtered.
pub fn detect(data: &[u8], table: &RuleTable) -> Result<Vec<Finding>> {
    let stubs = decode_stubs(data)?;
    Ok(table.findings_for(stubs))
}
