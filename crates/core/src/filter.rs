//! Search filter construction.
//!
//! Turns the raw `name` and `categoryId` query parameters into a validated
//! [`FilterSpec`]. The category parameter follows the grammar
//! `"" | "0" | <uint>("," <uint>)*`.

use crate::error::CoreError;
use crate::types::DbId;

/// Category parameter value meaning "no category restriction".
pub const UNSET_CATEGORY: &str = "0";

/// Canonical search predicate.
///
/// An empty category list means "do not restrict by category", never
/// "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    category_ids: Vec<DbId>,
    name_pattern: String,
}

impl FilterSpec {
    /// Build a filter from raw request parameters.
    ///
    /// Fails with [`CoreError::Validation`] if any category token is not an
    /// unsigned decimal integer, or if `name` contains a NUL character.
    pub fn parse(name: &str, category_csv: &str) -> Result<Self, CoreError> {
        if name.contains('\0') {
            return Err(CoreError::Validation(
                "Invalid filter: name must not contain NUL characters".to_string(),
            ));
        }
        Ok(Self {
            category_ids: parse_category_ids(category_csv)?,
            name_pattern: name.to_string(),
        })
    }

    /// Sorted, duplicate-free category ids. Empty means unrestricted.
    pub fn category_ids(&self) -> &[DbId] {
        &self.category_ids
    }

    /// Category ids as an optional bind value: `None` when unrestricted.
    pub fn category_filter(&self) -> Option<&[DbId]> {
        if self.category_ids.is_empty() {
            None
        } else {
            Some(&self.category_ids)
        }
    }

    /// Substring to look for in product names, as given.
    ///
    /// Stores fold case on both sides with the same function, so a product
    /// is always found by its own name.
    pub fn name_pattern(&self) -> &str {
        &self.name_pattern
    }

    /// Evaluate the predicate against one product, for stores that filter
    /// in memory.
    pub fn matches(&self, name: &str, category_ids: impl IntoIterator<Item = DbId>) -> bool {
        if !name
            .to_lowercase()
            .contains(&self.name_pattern.to_lowercase())
        {
            return false;
        }
        self.category_ids.is_empty()
            || category_ids
                .into_iter()
                .any(|id| self.category_ids.binary_search(&id).is_ok())
    }
}

/// Parse the comma-separated category parameter.
fn parse_category_ids(raw: &str) -> Result<Vec<DbId>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == UNSET_CATEGORY {
        return Ok(Vec::new());
    }

    let mut ids = raw
        .split(',')
        .map(|token| parse_category_token(token.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

fn parse_category_token(token: &str) -> Result<DbId, CoreError> {
    // `i64::from_str` accepts a leading sign; the grammar does not.
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_filter(token));
    }
    token.parse::<DbId>().map_err(|_| invalid_filter(token))
}

fn invalid_filter(token: &str) -> CoreError {
    CoreError::Validation(format!("Invalid filter: category id '{token}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn empty_and_sentinel_mean_unrestricted() {
        for raw in ["", "0", "  ", " 0 "] {
            let filter = FilterSpec::parse("", raw).unwrap();
            assert!(filter.category_ids().is_empty(), "input {raw:?}");
            assert_eq!(filter.category_filter(), None);
        }
    }

    #[test]
    fn unrestricted_filter_equals_default() {
        assert_eq!(FilterSpec::parse("", "0").unwrap(), FilterSpec::default());
        assert_eq!(FilterSpec::parse("", "").unwrap(), FilterSpec::default());
    }

    #[test]
    fn parses_single_and_multiple_ids() {
        assert_eq!(FilterSpec::parse("", "5").unwrap().category_ids(), &[5]);
        assert_eq!(
            FilterSpec::parse("", "3,1,2").unwrap().category_ids(),
            &[1, 2, 3]
        );
    }

    #[test]
    fn removes_duplicate_ids() {
        let filter = FilterSpec::parse("", "2,2,1,2").unwrap();
        assert_eq!(filter.category_ids(), &[1, 2]);
    }

    #[test]
    fn zero_inside_a_list_is_an_ordinary_id() {
        assert_eq!(FilterSpec::parse("", "0,4").unwrap().category_ids(), &[0, 4]);
    }

    #[test]
    fn tolerates_whitespace_around_tokens() {
        assert_eq!(FilterSpec::parse("", " 1 , 2").unwrap().category_ids(), &[1, 2]);
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        for raw in ["abc", "1,x", "1,,2", "1,", "-1", "+3", "1.5", "99999999999999999999"] {
            assert_matches!(
                FilterSpec::parse("", raw),
                Err(CoreError::Validation(msg)) if msg.starts_with("Invalid filter"),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn name_pattern_is_kept_verbatim() {
        let filter = FilterSpec::parse("PC Gamer", "0").unwrap();
        assert_eq!(filter.name_pattern(), "PC Gamer");
    }

    #[test]
    fn rejects_nul_in_name() {
        assert_matches!(
            FilterSpec::parse("a\0b", ""),
            Err(CoreError::Validation(msg)) if msg.starts_with("Invalid filter")
        );
    }

    #[test]
    fn matches_own_name_with_final_sigma() {
        let filter = FilterSpec::parse("ΟΔΟΣ Guide", "").unwrap();
        assert!(filter.matches("ΟΔΟΣ Guide", []));
        assert!(filter.matches("The ΟΔΟΣ Guide, 2nd ed.", []));
    }

    #[test]
    fn matches_is_case_insensitive_substring() {
        let filter = FilterSpec::parse("gAmEr", "").unwrap();
        assert!(filter.matches("PC Gamer Alfa", []));
        assert!(!filter.matches("Macbook Pro", []));
    }

    #[test]
    fn empty_name_matches_everything() {
        let filter = FilterSpec::parse("", "").unwrap();
        assert!(filter.matches("anything", []));
    }

    #[test]
    fn matches_requires_one_shared_category() {
        let filter = FilterSpec::parse("", "5,7").unwrap();
        assert!(filter.matches("x", [1, 7]));
        assert!(!filter.matches("x", [1, 2]));
        assert!(!filter.matches("x", []));
    }
}
