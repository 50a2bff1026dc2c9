use std::collections::HashMap;

/// Experimental and third-party data for a single ligand, in kcal/mol.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentalRecord {
    pub name: String,
    /// Experimental absolute binding free energy.
    pub exp_dg: f64,
    /// Experimental uncertainty; zero when the source file has no error column.
    pub exp_dg_err: f64,
    /// Absolute free energy predicted by the third-party method.
    pub pred_dg: f64,
    pub pred_dg_err: f64,
}

/// One computed relative free-energy difference, `ddg = dG(ligand_j) - dG(ligand_i)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedRecord {
    pub ligand_i: String,
    pub ligand_j: String,
    pub ddg: f64,
    pub ddg_err: f64,
}

impl CalculatedRecord {
    /// The `"ligand_i->ligand_j"` key this record is stored under.
    pub fn tag(&self) -> String {
        edge_tag(&self.ligand_i, &self.ligand_j)
    }
}

pub fn edge_tag(ligand_i: &str, ligand_j: &str) -> String {
    format!("{}->{}", ligand_i, ligand_j)
}

/// Experimental records keyed by ligand name, iterated in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentalData {
    records: Vec<ExperimentalRecord>,
    index: HashMap<String, usize>,
}

impl ExperimentalData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing any earlier record with the same name in place.
    ///
    /// Returns `true` if a previous record was replaced.
    pub fn insert(&mut self, record: ExperimentalRecord) -> bool {
        match self.index.get(&record.name) {
            Some(&slot) => {
                self.records[slot] = record;
                true
            }
            None => {
                self.index.insert(record.name.clone(), self.records.len());
                self.records.push(record);
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ExperimentalRecord> {
        self.index.get(name).map(|&slot| &self.records[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExperimentalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Arithmetic mean of the experimental dG over every ligand, or `None` when empty.
    pub fn mean_exp_dg(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let sum: f64 = self.records.iter().map(|r| r.exp_dg).sum();
        Some(sum / self.records.len() as f64)
    }
}

/// Calculated records keyed by their `"ligand_i->ligand_j"` tag, iterated in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatedData {
    records: Vec<CalculatedRecord>,
    index: HashMap<String, usize>,
}

impl CalculatedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing any earlier record with the same tag in place.
    pub fn insert(&mut self, record: CalculatedRecord) -> bool {
        let tag = record.tag();
        match self.index.get(&tag) {
            Some(&slot) => {
                self.records[slot] = record;
                true
            }
            None => {
                self.index.insert(tag, self.records.len());
                self.records.push(record);
                false
            }
        }
    }

    pub fn get(&self, tag: &str) -> Option<&CalculatedRecord> {
        self.index.get(tag).map(|&slot| &self.records[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalculatedRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(name: &str, dg: f64) -> ExperimentalRecord {
        ExperimentalRecord {
            name: name.to_string(),
            exp_dg: dg,
            exp_dg_err: 0.0,
            pred_dg: dg,
            pred_dg_err: 0.0,
        }
    }

    #[test]
    fn experimental_insert_replaces_in_place_and_keeps_order() {
        let mut data = ExperimentalData::new();
        assert!(!data.insert(exp("a", -8.0)));
        assert!(!data.insert(exp("b", -9.0)));
        assert!(data.insert(exp("a", -7.0)));

        let names: Vec<_> = data.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(data.get("a").unwrap().exp_dg, -7.0);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn mean_exp_dg_averages_all_records() {
        let mut data = ExperimentalData::new();
        assert_eq!(data.mean_exp_dg(), None);
        data.insert(exp("a", -8.0));
        data.insert(exp("b", -10.0));
        assert_eq!(data.mean_exp_dg(), Some(-9.0));
    }

    #[test]
    fn calculated_records_are_keyed_by_directed_tag() {
        let mut data = CalculatedData::new();
        data.insert(CalculatedRecord {
            ligand_i: "a".into(),
            ligand_j: "b".into(),
            ddg: 1.0,
            ddg_err: 0.1,
        });
        data.insert(CalculatedRecord {
            ligand_i: "b".into(),
            ligand_j: "a".into(),
            ddg: -1.0,
            ddg_err: 0.1,
        });

        assert_eq!(data.len(), 2);
        assert_eq!(data.get("a->b").unwrap().ddg, 1.0);
        assert_eq!(data.get("b->a").unwrap().ddg, -1.0);
        assert!(data.get("a-b").is_none());
    }
}
