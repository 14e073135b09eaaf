//! Table and CSV rendering of rules and applications for the terminal.

use tabled::{Table, Tabled, settings::Style};

use crate::rewriting::{Application, Rule};

/// A row type that can be printed both as a pretty table and as CSV.
pub trait Formattable: Tabled {
    /// Convert the row to CSV fields
    fn to_csv_row(&self) -> Vec<String>;

    fn csv_headers() -> Vec<&'static str>;
}

#[derive(Clone, Debug, Tabled)]
pub struct ApplicationRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Rule")]
    pub rule: String,
    #[tabled(rename = "Direction")]
    pub direction: String,
    #[tabled(rename = "Position")]
    pub position: String,
    #[tabled(rename = "Rewrite")]
    pub description: String,
    #[tabled(rename = "Result")]
    pub full_preview: String,
}

impl ApplicationRow {
    pub fn rows(applications: &[Application]) -> Vec<Self> {
        applications
            .iter()
            .enumerate()
            .map(|(index, application)| Self {
                index,
                rule: application.rule.id.clone(),
                direction: application.direction.to_string(),
                position: application.position.to_string(),
                description: application.description.clone(),
                full_preview: application.full_preview.clone(),
            })
            .collect()
    }
}

impl Formattable for ApplicationRow {
    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.rule.clone(),
            self.direction.clone(),
            self.position.clone(),
            self.description.clone(),
            self.full_preview.clone(),
        ]
    }

    fn csv_headers() -> Vec<&'static str> {
        vec!["index", "rule", "direction", "position", "description", "fullPreview"]
    }
}

#[derive(Clone, Debug, Tabled)]
pub struct RuleRow {
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Left")]
    pub left: String,
    #[tabled(rename = "Right")]
    pub right: String,
}

impl From<&Rule> for RuleRow {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id.clone(),
            name: rule.name.clone(),
            category: rule.category.to_string(),
            left: rule.left_pattern.clone(),
            right: rule.right_pattern.clone(),
        }
    }
}

impl Formattable for RuleRow {
    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.category.clone(),
            self.left.clone(),
            self.right.clone(),
        ]
    }

    fn csv_headers() -> Vec<&'static str> {
        vec!["id", "name", "category", "leftPattern", "rightPattern"]
    }
}

/// Pretty table formatter using the tabled library
pub struct PrettyFormatter;

impl PrettyFormatter {
    pub fn format<T: Formattable>(items: &[T]) -> String {
        if items.is_empty() {
            return String::new();
        }

        let mut table = Table::new(items);
        table.with(Style::rounded());

        table.to_string()
    }
}

pub struct CsvFormatter;

impl CsvFormatter {
    /// Format a collection of rows as CSV, header first.
    pub fn format<T: Formattable>(items: &[T]) -> Result<String, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(T::csv_headers())?;
        for item in items {
            writer.write_record(item.to_csv_row())?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|error| csv::Error::from(error.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationRow, CsvFormatter, PrettyFormatter, RuleRow};
    use crate::language::parse;
    use crate::rewriting::{RuleCatalog, RuleEngine};

    #[test]
    fn application_rows() {
        let engine = RuleEngine::new();
        let applications = engine.all_possible_applications(&parse("¬¬a").unwrap());
        let rows = ApplicationRow::rows(&applications);

        assert_eq!(rows.len(), applications.len());
        assert_eq!(rows[3].index, 3);
        assert!(rows.iter().any(|row| row.rule == "double-negation"
            && row.direction == "left-to-right"
            && row.position == "[]"
            && row.full_preview == "a"));
    }

    #[test]
    fn csv_output() {
        let catalog = RuleCatalog::builtin();
        let rows: Vec<RuleRow> = catalog.iter().map(RuleRow::from).collect();
        let csv = CsvFormatter::format(&rows).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("id,name,category,leftPattern,rightPattern"));
        assert_eq!(
            lines.next(),
            Some("commutativity-and,Commutativity of AND,commutativity,A ∧ B,B ∧ A")
        );
        assert_eq!(csv.lines().count(), 32);
    }

    #[test]
    fn csv_fields_are_quoted() {
        let engine = RuleEngine::new();
        let applications = engine.all_possible_applications(&parse("a ∧ (b ∨ c)").unwrap());
        let output = CsvFormatter::format(&ApplicationRow::rows(&applications)).unwrap();

        assert!(output.contains(",\"[1,0]\","));
        let mut reader = csv::Reader::from_reader(output.as_bytes());
        assert_eq!(reader.records().count(), applications.len());
    }

    #[test]
    fn pretty_table() {
        assert!(PrettyFormatter::format::<RuleRow>(&[]).is_empty());

        let catalog = RuleCatalog::builtin();
        let rows: Vec<RuleRow> = catalog.iter().take(2).map(RuleRow::from).collect();
        let table = PrettyFormatter::format(&rows);
        assert!(table.contains("commutativity-or"));
        assert!(table.contains("Category"));
        assert!(table.starts_with('╭'));
    }
}
