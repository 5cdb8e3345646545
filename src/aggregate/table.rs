use serde_json::{Map, Value};

use crate::trial::AgentLabel;

use super::group::{FieldValue, GroupField};
use super::record::AggregateRecord;

/// The largest value of each statistic column, `None` for an empty table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnMaxima {
    pub win_rate: Option<f64>,
    pub mean_score: Option<f64>,
    pub count: Option<usize>,
}

/// Aggregate records ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    group_by: Vec<GroupField>,
    records: Vec<AggregateRecord>,
}

impl AggregateTable {
    pub fn new(group_by: Vec<GroupField>, records: Vec<AggregateRecord>) -> Self {
        Self { group_by, records }
    }

    pub fn group_by(&self) -> &[GroupField] {
        &self.group_by
    }

    pub fn records(&self) -> &[AggregateRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_maxima(&self) -> ColumnMaxima {
        self.records.iter().fold(ColumnMaxima::default(), |max, r| ColumnMaxima {
            win_rate: Some(max.win_rate.map_or(r.win_rate, |m| m.max(r.win_rate))),
            mean_score: Some(max.mean_score.map_or(r.mean_score, |m| m.max(r.mean_score))),
            count: Some(max.count.map_or(r.count, |m| m.max(r.count))),
        })
    }

    /// Render as a Markdown table with the best value of each statistic in
    /// bold.
    pub fn to_markdown(&self) -> String {
        let maxima = self.column_maxima();
        let mut output = String::new();

        let mut header: Vec<&str> = self.group_by.iter().map(|f| f.column()).collect();
        header.extend(["win_rate", "mean_score", "count"]);
        output.push_str(&format!("| {} |\n", header.join(" | ")));
        output.push_str(&format!(
            "|{}\n",
            header
                .iter()
                .map(|h| format!("{}|", "-".repeat(h.len() + 2)))
                .collect::<String>()
        ));

        for record in &self.records {
            let mut cells: Vec<String> = self
                .group_by
                .iter()
                .zip(&record.group_key.0)
                .map(|(field, value)| match (field, value) {
                    (GroupField::Agent, FieldValue::Text(label)) => AgentLabel::display(label),
                    _ => value.to_string(),
                })
                .collect();
            cells.push(mark(
                format!("{:.2}", record.win_rate),
                maxima.win_rate == Some(record.win_rate),
            ));
            cells.push(mark(
                format!("{:.2}", record.mean_score),
                maxima.mean_score == Some(record.mean_score),
            ));
            cells.push(mark(
                record.count.to_string(),
                maxima.count == Some(record.count),
            ));
            output.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        output
    }

    /// Render as a JSON array with one object per group.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let rows: Vec<Value> = self
            .records
            .iter()
            .map(|record| -> serde_json::Result<Value> {
                let mut object = Map::new();
                for (field, value) in self.group_by.iter().zip(&record.group_key.0) {
                    object.insert(field.column().to_string(), serde_json::to_value(value)?);
                }
                object.insert("win_rate".to_string(), Value::from(record.win_rate));
                object.insert("mean_score".to_string(), Value::from(record.mean_score));
                object.insert("count".to_string(), Value::from(record.count));
                Ok(Value::Object(object))
            })
            .collect::<serde_json::Result<_>>()?;
        serde_json::to_string_pretty(&rows)
    }
}

fn mark(cell: String, is_max: bool) -> String {
    if is_max {
        format!("**{}**", cell)
    } else {
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{GroupKey, aggregate};
    use crate::test_util::row;

    fn table() -> AggregateTable {
        let rows = vec![
            row("MCTS_1000", 2, 12),
            row("MCTS_1000", 2, 10),
            row("Random", 2, 1),
        ];
        let group_by = vec![GroupField::Agent, GroupField::PlayerCount];
        let records = aggregate(&rows, &group_by, 12);
        AggregateTable::new(group_by, records)
    }

    #[test]
    fn test_column_maxima() {
        let maxima = table().column_maxima();
        assert_eq!(maxima.win_rate, Some(0.5));
        assert_eq!(maxima.mean_score, Some(11.0));
        assert_eq!(maxima.count, Some(2));
        assert_eq!(
            AggregateTable::new(vec![], vec![]).column_maxima(),
            ColumnMaxima::default()
        );
    }

    #[test]
    fn test_markdown_marks_maxima() {
        let markdown = table().to_markdown();
        let lines: Vec<&str> = markdown.lines().collect();
        assert_eq!(
            lines[0],
            "| agent | player_count | win_rate | mean_score | count |"
        );
        assert_eq!(lines[1], "|-------|--------------|----------|------------|-------|");
        assert_eq!(lines[2], "| MCTS 1K | 2 | **0.50** | **11.00** | **2** |");
        assert_eq!(lines[3], "| Random | 2 | 0.00 | 1.00 | 1 |");
    }

    #[test]
    fn test_ties_are_all_marked() {
        let rows = vec![row("MCTS_10", 2, 12), row("MCTS_100", 2, 12)];
        let records = aggregate(&rows, &[GroupField::Agent], 12);
        let markdown = AggregateTable::new(vec![GroupField::Agent], records).to_markdown();
        assert_eq!(markdown.matches("**1.00**").count(), 2);
    }

    #[test]
    fn test_json() {
        let mut records = table().records().to_vec();
        records[1].group_key =
            GroupKey(vec![FieldValue::Text("Random".into()), FieldValue::Absent]);
        let json = AggregateTable::new(
            vec![GroupField::Agent, GroupField::PolicyVariant],
            records,
        )
        .to_json()
        .unwrap();

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["agent"], "MCTS_1000");
        assert_eq!(value[0]["tree_policy"], 2);
        assert_eq!(value[0]["count"], 2);
        assert_eq!(value[1]["tree_policy"], Value::Null);
        assert_eq!(value[1]["win_rate"], 0.0);
    }
}
