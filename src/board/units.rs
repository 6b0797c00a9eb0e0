// src/board/units.rs
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::csv::parse_rows;
use crate::error::ResourceError;

/// Small integer code standing in for a unit identifier on the board.
/// Stable only within one loaded `UnitIndex`.
pub type UnitCode = u16;

/* ---------------- Unit index ---------------- */

/// Two-way mapping between textual unit identifiers (`"pollywog_unit_id"`)
/// and their integer codes. Identifiers are lowercased on insert; callers
/// lowercase before lookup.
#[derive(Clone, Debug, Default)]
pub struct UnitIndex {
    codes: HashMap<String, UnitCode>,
    names: HashMap<UnitCode, String>,
}

impl UnitIndex {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, UnitCode)>,
        S: Into<String>,
    {
        let mut index = Self::default();
        for (id, code) in entries {
            let id = id.into().to_ascii_lowercase();
            index.codes.insert(id.clone(), code);
            index.names.insert(code, id);
        }
        index
    }

    /// Load from a CSV resource with `unitId` and `id` columns.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let text = fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv(&text)
    }

    pub fn from_csv(text: &str) -> Result<Self, ResourceError> {
        let mut rows = parse_rows(text, ',').into_iter();
        let headers = rows.next().unwrap_or_default();
        let id_col = column(&headers, "unitId").ok_or(ResourceError::MissingColumn("unitId"))?;
        let code_col = column(&headers, "id").ok_or(ResourceError::MissingColumn("id"))?;

        let mut entries = Vec::new();
        for row in rows {
            let (Some(unit), Some(code)) = (row.get(id_col), row.get(code_col)) else {
                continue;
            };
            let code: UnitCode = code
                .trim()
                .parse()
                .map_err(|_| ResourceError::BadUnitCode {
                    unit: unit.clone(),
                    value: code.clone(),
                })?;
            entries.push((unit.clone(), code));
        }
        Ok(Self::from_entries(entries))
    }

    /// Code for an identifier; `None` means the unit is unknown (disabled
    /// or removed content) and should be skipped.
    pub fn code_of(&self, identifier: &str) -> Option<UnitCode> {
        self.codes.get(identifier).copied()
    }

    /// Identifier for a code. Codes only enter boards through this index,
    /// so a miss is a caller bug; it maps to "" rather than a panic.
    pub fn identifier_of(&self, code: UnitCode) -> &str {
        debug_assert!(self.contains_code(code), "unknown unit code {code}");
        self.names.get(&code).map(String::as_str).unwrap_or("")
    }

    pub fn contains_code(&self, code: UnitCode) -> bool {
        self.names.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/* ---------------- Upgrade tree ---------------- */

/// The JSON resource lists descendants either as identifiers or as raw
/// integer codes; both come from the same upstream data set.
#[derive(Deserialize)]
#[serde(untagged)]
enum Descendants {
    Ids(Vec<String>),
    Codes(Vec<UnitCode>),
}

/// Maps every unit code to the code of its upgrade line's base unit.
/// Membership is reflexive: a base resolves to itself even when the
/// resource omits it from its own bucket.
#[derive(Clone, Debug, Default)]
pub struct UpgradeTree {
    base_of: HashMap<UnitCode, UnitCode>,
}

impl UpgradeTree {
    /// Load from a JSON object of `base identifier → descendant list`.
    pub fn load(path: &Path, units: &UnitIndex) -> Result<Self, ResourceError> {
        let text = fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, units)
    }

    pub fn from_json(text: &str, units: &UnitIndex) -> Result<Self, ResourceError> {
        let raw: HashMap<String, Descendants> = serde_json::from_str(text)?;
        let mut tree = Self::default();
        for (base_id, descendants) in raw {
            let codes: Vec<UnitCode> = match descendants {
                Descendants::Ids(ids) => ids
                    .iter()
                    .filter_map(|id| units.code_of(&id.to_ascii_lowercase()))
                    .collect(),
                Descendants::Codes(codes) => codes
                    .into_iter()
                    .filter(|&c| units.contains_code(c))
                    .collect(),
            };
            // A base missing from the index still groups its known
            // descendants; the first one stands in as the group key.
            let base = units
                .code_of(&base_id.to_ascii_lowercase())
                .or_else(|| codes.first().copied());
            let Some(base) = base else { continue };

            tree.base_of.insert(base, base);
            for code in codes {
                tree.base_of.insert(code, base);
            }
        }
        Ok(tree)
    }

    /// Convenience builder for in-code trees (tests, embedded data).
    pub fn from_groups(groups: &[(&str, &[&str])], units: &UnitIndex) -> Self {
        let mut tree = Self::default();
        for (base_id, descendants) in groups {
            let Some(base) = units.code_of(base_id) else {
                continue;
            };
            tree.base_of.insert(base, base);
            for id in *descendants {
                if let Some(code) = units.code_of(id) {
                    tree.base_of.insert(code, base);
                }
            }
        }
        tree
    }

    /// Base unit code for `code`, or `None` when the code is outside the
    /// tree. Callers decide what a miss means (see the differ's policy).
    pub fn base_of(&self, code: UnitCode) -> Option<UnitCode> {
        self.base_of.get(&code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> UnitIndex {
        UnitIndex::from_entries([
            ("pollywog_unit_id", 0),
            ("mudman_unit_id", 1),
            ("golem_unit_id", 2),
            ("seedling_unit_id", 3),
        ])
    }

    #[test]
    fn csv_load_resolves_both_directions() {
        let csv = "unitId,id\nPollywog_Unit_Id,0\nmudman_unit_id,1\n";
        let index = UnitIndex::from_csv(csv).unwrap();
        assert_eq!(index.code_of("pollywog_unit_id"), Some(0));
        assert_eq!(index.identifier_of(1), "mudman_unit_id");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn csv_load_rejects_missing_columns() {
        let err = UnitIndex::from_csv("name,id\nx,0\n").unwrap_err();
        assert!(matches!(err, ResourceError::MissingColumn("unitId")));
    }

    #[test]
    fn csv_load_rejects_non_numeric_codes() {
        let err = UnitIndex::from_csv("unitId,id\nx_unit_id,zero\n").unwrap_err();
        assert!(matches!(err, ResourceError::BadUnitCode { .. }));
    }

    #[test]
    fn tree_membership_is_reflexive() {
        let units = index();
        let tree = UpgradeTree::from_json(
            r#"{"mudman_unit_id": ["golem_unit_id"]}"#,
            &units,
        )
        .unwrap();
        let mudman = units.code_of("mudman_unit_id").unwrap();
        let golem = units.code_of("golem_unit_id").unwrap();
        assert_eq!(tree.base_of(mudman), Some(mudman));
        assert_eq!(tree.base_of(golem), Some(mudman));
        assert_eq!(tree.base_of(units.code_of("seedling_unit_id").unwrap()), None);
    }

    #[test]
    fn tree_accepts_integer_code_lists() {
        let units = index();
        let tree = UpgradeTree::from_json(r#"{"mudman_unit_id": [2]}"#, &units).unwrap();
        assert_eq!(tree.base_of(2), units.code_of("mudman_unit_id"));
    }

    #[test]
    fn unknown_base_groups_through_first_descendant() {
        let units = index();
        let tree = UpgradeTree::from_json(
            r#"{"retired_unit_id": ["golem_unit_id", "seedling_unit_id"]}"#,
            &units,
        )
        .unwrap();
        let golem = units.code_of("golem_unit_id").unwrap();
        let seedling = units.code_of("seedling_unit_id").unwrap();
        assert_eq!(tree.base_of(golem), tree.base_of(seedling));
        assert!(tree.base_of(golem).is_some());
    }
}
