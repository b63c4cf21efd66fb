//! Filter formulas for the record store's query DSL.
//!
//! A formula is a boolean expression such as
//! `AND({Category} = "Warm Lead", FIND("Jane", {Owner}) > 0)`. Each active
//! [`Predicate`] renders to one sub-expression; [`FormulaBuilder::build`]
//! joins them:
//!
//! - no predicates: empty string (no filter sent)
//! - one predicate: the bare sub-expression
//! - several: `AND(a, b, ...)` in insertion order
//!
//! Saved dashboard queries depend on these exact sub-expressions.

use std::fmt;

use crate::record::field;
use crate::ClientCategory;

/// Days since last outreach at which a client counts as overdue.
pub const OVERDUE_THRESHOLD_DAYS: i64 = 3;

/// Which set of text fields a free-text search fans out over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchTarget {
    /// Client name, city, province/state.
    Clients,
    /// Contact full name, title, email.
    Contacts,
}

impl SearchTarget {
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            SearchTarget::Clients => &[field::CLIENT_NAME, field::CITY, field::PROVINCE_STATE],
            SearchTarget::Contacts => &[field::FULL_NAME, field::TITLE, field::EMAIL],
        }
    }
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `{Days Since Last Outreach} >= 3`
    Overdue,
    /// `{Category} = "<category>"`
    CategoryIs(ClientCategory),
    /// `FIND("<owner>", {Owner}) > 0`
    OwnerContains(String),
    /// `FIND("<id>", ARRAYJOIN({<field>}, ",")) > 0`
    LinkedTo { field: &'static str, id: String },
    /// `{Do Not Contact} != 1`
    ExcludeDoNotContact,
    /// Case-insensitive substring match OR'd across the target's fields.
    Search { text: String, target: SearchTarget },
}

impl Predicate {
    pub fn to_formula(&self) -> String {
        match self {
            Predicate::Overdue => format!(
                "{{{}}} >= {}",
                field::DAYS_SINCE_LAST_OUTREACH,
                OVERDUE_THRESHOLD_DAYS
            ),
            Predicate::CategoryIs(category) => format!(
                "{{{}}} = \"{}\"",
                field::CATEGORY,
                escape_literal(category.as_db_str())
            ),
            Predicate::OwnerContains(owner) => {
                format!("FIND(\"{}\", {{{}}}) > 0", escape_literal(owner), field::OWNER)
            }
            Predicate::LinkedTo { field, id } => format!(
                "FIND(\"{}\", ARRAYJOIN({{{}}}, \",\")) > 0",
                escape_literal(id),
                field
            ),
            Predicate::ExcludeDoNotContact => format!("{{{}}} != 1", field::DO_NOT_CONTACT),
            Predicate::Search { text, target } => {
                let needle = escape_literal(text);
                let clauses: Vec<String> = target
                    .fields()
                    .iter()
                    .map(|f| format!("FIND(UPPER(\"{}\"), UPPER({{{}}})) > 0", needle, f))
                    .collect();
                format!("OR({})", clauses.join(", "))
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_formula())
    }
}

/// Escape a value for use inside a double-quoted formula string literal.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Join sub-expressions: empty, bare, or `AND(...)`.
pub fn combine_and(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [single] => single.clone(),
        many => format!("AND({})", many.join(", ")),
    }
}

/// Collects predicates from optional request parameters.
///
/// The optional-argument methods skip `None` and blank strings, so handlers
/// can pass query parameters straight through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaBuilder {
    predicates: Vec<Predicate>,
}

impl FormulaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn overdue(self, only_overdue: bool) -> Self {
        if only_overdue {
            self.push(Predicate::Overdue)
        } else {
            self
        }
    }

    pub fn category(self, category: Option<ClientCategory>) -> Self {
        match category {
            Some(c) => self.push(Predicate::CategoryIs(c)),
            None => self,
        }
    }

    pub fn owner(self, owner: Option<&str>) -> Self {
        match non_blank(owner) {
            Some(o) => self.push(Predicate::OwnerContains(o.to_string())),
            None => self,
        }
    }

    pub fn linked_to(self, field: &'static str, id: Option<&str>) -> Self {
        match non_blank(id) {
            Some(id) => self.push(Predicate::LinkedTo {
                field,
                id: id.to_string(),
            }),
            None => self,
        }
    }

    pub fn exclude_do_not_contact(self) -> Self {
        self.push(Predicate::ExcludeDoNotContact)
    }

    pub fn search(self, text: Option<&str>, target: SearchTarget) -> Self {
        match non_blank(text) {
            Some(t) => self.push(Predicate::Search {
                text: t.to_string(),
                target,
            }),
            None => self,
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Render the formula. Empty when no predicate is active.
    pub fn build(&self) -> String {
        let parts: Vec<String> = self.predicates.iter().map(Predicate::to_formula).collect();
        combine_and(&parts)
    }

    /// Render the formula, or `None` when there is nothing to filter on.
    pub fn build_optional(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.build())
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Formula selecting every contactable overdue client.
pub fn overdue_digest_formula() -> String {
    FormulaBuilder::new()
        .exclude_do_not_contact()
        .overdue(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_predicates_is_empty() {
        let builder = FormulaBuilder::new().owner(None).search(Some("   "), SearchTarget::Clients);
        assert_eq!(builder.build(), "");
        assert_eq!(builder.build_optional(), None);
    }

    #[test]
    fn test_single_predicate_is_bare() {
        assert_eq!(
            FormulaBuilder::new().overdue(true).build(),
            "{Days Since Last Outreach} >= 3"
        );
        assert_eq!(
            FormulaBuilder::new()
                .category(Some(ClientCategory::WarmLead))
                .build(),
            "{Category} = \"Warm Lead\""
        );
        assert_eq!(
            FormulaBuilder::new().owner(Some("Jane")).build(),
            "FIND(\"Jane\", {Owner}) > 0"
        );
    }

    #[test]
    fn test_client_search_fans_out() {
        let formula = FormulaBuilder::new()
            .search(Some("elite"), SearchTarget::Clients)
            .build();
        assert_eq!(
            formula,
            "OR(FIND(UPPER(\"elite\"), UPPER({Client Name})) > 0, \
             FIND(UPPER(\"elite\"), UPPER({City})) > 0, \
             FIND(UPPER(\"elite\"), UPPER({Province/State})) > 0)"
        );
    }

    #[test]
    fn test_contact_search_fields() {
        let formula = FormulaBuilder::new()
            .search(Some("maria"), SearchTarget::Contacts)
            .build();
        assert!(formula.contains("UPPER({Full Name})"));
        assert!(formula.contains("UPPER({Title})"));
        assert!(formula.contains("UPPER({Email})"));
    }

    #[test]
    fn test_multiple_predicates_wrap_in_and() {
        let formula = FormulaBuilder::new()
            .exclude_do_not_contact()
            .linked_to(field::LINKED_CLIENT, Some("rec123"))
            .owner(Some("Jane"))
            .build();
        assert_eq!(
            formula,
            "AND({Do Not Contact} != 1, \
             FIND(\"rec123\", ARRAYJOIN({Linked Client}, \",\")) > 0, \
             FIND(\"Jane\", {Owner}) > 0)"
        );
    }

    #[test]
    fn test_digest_formula() {
        assert_eq!(
            overdue_digest_formula(),
            "AND({Do Not Contact} != 1, {Days Since Last Outreach} >= 3)"
        );
    }

    #[test]
    fn test_quotes_in_values_are_escaped() {
        let formula = FormulaBuilder::new().owner(Some("O\"Brien\\")).build();
        assert_eq!(formula, "FIND(\"O\\\"Brien\\\\\", {Owner}) > 0");
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_predicate() -> impl Strategy<Value = Predicate> {
        prop_oneof![
            Just(Predicate::Overdue),
            Just(Predicate::ExcludeDoNotContact),
            prop::sample::select(ClientCategory::ALL.to_vec()).prop_map(Predicate::CategoryIs),
            "[A-Za-z ]{1,12}".prop_map(Predicate::OwnerContains),
            "rec[A-Za-z0-9]{5}".prop_map(|id| Predicate::LinkedTo {
                field: field::LINKED_CLIENT,
                id,
            }),
            "[A-Za-z]{1,12}".prop_map(|text| Predicate::Search {
                text,
                target: SearchTarget::Clients,
            }),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Shape depends only on how many predicates are active.
        #[test]
        fn prop_formula_shape_by_count(predicates in prop::collection::vec(arb_predicate(), 0..6)) {
            let builder = predicates
                .iter()
                .cloned()
                .fold(FormulaBuilder::new(), FormulaBuilder::push);
            let formula = builder.build();

            match predicates.len() {
                0 => prop_assert_eq!(formula, ""),
                1 => prop_assert_eq!(formula, predicates[0].to_formula()),
                _ => {
                    let expected_body: Vec<String> =
                        predicates.iter().map(Predicate::to_formula).collect();
                    prop_assert_eq!(formula, format!("AND({})", expected_body.join(", ")));
                }
            }
        }
    }
}
