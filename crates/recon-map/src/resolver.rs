use tracing::{debug, info};

use recon_model::{ColumnMap, ColumnPair, MappingRule, TypeTag};

/// Target-side column suffix for a target file category. Only the
/// secondary revascularization report gets one; its fields collide
/// with the main export otherwise.
pub fn target_suffix(category: &str) -> &'static str {
    if category.trim().to_ascii_lowercase().contains("revasc") {
        " (REVASC)"
    } else {
        ""
    }
}

/// Resolve the tag a column pair is compared under.
///
/// The target schema is authoritative: its tag decides how both sides
/// coerce, and a numeric target tag in particular always overrides a
/// non-numeric source declaration. The source tag is consulted only
/// when the target tag is blank or unrecognized.
fn comparison_type(source: Option<TypeTag>, target: Option<TypeTag>) -> TypeTag {
    target.or(source).unwrap_or(TypeTag::Str)
}

/// Build the bidirectional column association from mapping rules.
///
/// Rules are processed in table order; a later rule with the same
/// qualified source column overwrites the earlier one.
pub fn build_column_map(rules: &[MappingRule]) -> ColumnMap {
    let mut map = ColumnMap::new();
    for rule in rules {
        if !rule.is_valid() {
            debug!(?rule, "skipping mapping rule with blank field name");
            continue;
        }
        let source_type = rule.source_type.unwrap_or(TypeTag::Str);
        let target_type = rule.target_type.unwrap_or(TypeTag::Str);
        let pair = ColumnPair {
            source_column: format!(
                "{}{}",
                rule.source_category.prefix(),
                rule.source_field.trim()
            ),
            target_column: format!(
                "{}{}",
                rule.target_field.trim(),
                target_suffix(&rule.target_category)
            ),
            source_type,
            target_type,
            comparison_type: comparison_type(rule.source_type, rule.target_type),
        };
        map.insert(pair);
    }
    info!(pairs = map.len(), "resolved column mapping");
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_model::FileCategory;

    fn rule(
        source_field: &str,
        category: FileCategory,
        source_type: Option<TypeTag>,
        target_field: &str,
        target_category: &str,
        target_type: Option<TypeTag>,
    ) -> MappingRule {
        MappingRule {
            source_field: source_field.to_string(),
            source_category: category,
            source_type,
            target_field: target_field.to_string(),
            target_category: target_category.to_string(),
            target_type,
        }
    }

    #[test]
    fn qualifies_names_with_prefix_and_suffix() {
        let rules = vec![
            rule(
                "sex",
                FileCategory::Encounter,
                Some(TypeTag::Int),
                "Sex",
                "SSR",
                Some(TypeTag::Str),
            ),
            rule(
                "iat_mech",
                FileCategory::Imaging,
                Some(TypeTag::Bool),
                "Mechanical thrombectomy",
                "REVASC report",
                Some(TypeTag::Bool),
            ),
        ];
        let map = build_column_map(&rules);
        assert_eq!(map.len(), 2);
        let sex = map.get("enct.sex").expect("sex pair");
        assert_eq!(sex.target_column, "Sex");
        let iat = map.get("img.iat_mech").expect("iat pair");
        assert_eq!(iat.target_column, "Mechanical thrombectomy (REVASC)");
    }

    #[test]
    fn unrecognized_category_has_no_prefix() {
        let rules = vec![rule(
            "weight",
            FileCategory::Other,
            Some(TypeTag::Float),
            "Weight",
            "SSR",
            Some(TypeTag::Float),
        )];
        let map = build_column_map(&rules);
        assert!(map.get("weight").is_some());
    }

    #[test]
    fn numeric_target_type_is_authoritative() {
        let rules = vec![rule(
            "weight",
            FileCategory::Encounter,
            Some(TypeTag::Str),
            "Weight",
            "SSR",
            Some(TypeTag::FloatN(1)),
        )];
        let map = build_column_map(&rules);
        let pair = map.get("enct.weight").expect("pair");
        assert_eq!(pair.comparison_type, TypeTag::FloatN(1));
    }

    #[test]
    fn blank_target_type_falls_back_to_source() {
        let rules = vec![rule(
            "sex",
            FileCategory::Encounter,
            Some(TypeTag::Int),
            "Sex",
            "SSR",
            None,
        )];
        let map = build_column_map(&rules);
        assert_eq!(map.get("enct.sex").unwrap().comparison_type, TypeTag::Int);
    }

    #[test]
    fn later_duplicate_rule_overwrites() {
        let rules = vec![
            rule(
                "sex",
                FileCategory::Encounter,
                Some(TypeTag::Int),
                "Sex",
                "SSR",
                Some(TypeTag::Str),
            ),
            rule(
                "sex",
                FileCategory::Encounter,
                Some(TypeTag::Int),
                "Gender",
                "SSR",
                Some(TypeTag::Str),
            ),
        ];
        let map = build_column_map(&rules);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("enct.sex").unwrap().target_column, "Gender");
    }

    #[test]
    fn invalid_rules_are_skipped() {
        let rules = vec![rule(
            "",
            FileCategory::Encounter,
            Some(TypeTag::Int),
            "Sex",
            "SSR",
            Some(TypeTag::Str),
        )];
        let map = build_column_map(&rules);
        assert!(map.is_empty());
    }
}
