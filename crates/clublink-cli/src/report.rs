//! Terminal rendering for command output.

use clublink_db::{SchemaReport, SmokeReport, TableCount};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Table")]
    table: String,
    #[tabled(rename = "Rows")]
    rows: u64,
}

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Table")]
    table: String,
    #[tabled(rename = "Present")]
    present: &'static str,
    #[tabled(rename = "Columns")]
    columns: usize,
    #[tabled(rename = "Rows")]
    rows: String,
}

#[derive(Tabled)]
struct EnumRow {
    #[tabled(rename = "Enum")]
    name: String,
    #[tabled(rename = "Labels")]
    labels: String,
}

#[derive(Tabled)]
struct ForeignKeyRow {
    #[tabled(rename = "Constraint")]
    constraint: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
}

const fn yes_no(present: bool) -> &'static str {
    if present { "yes" } else { "NO" }
}

fn render<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Per-table row counts.
pub fn counts_table(counts: &[TableCount]) -> String {
    let rows: Vec<CountRow> = counts
        .iter()
        .map(|c| CountRow {
            table: c.table.to_string(),
            rows: c.rows,
        })
        .collect();
    render(&rows)
}

/// Full schema verification report.
pub fn schema_report(report: &SchemaReport) -> String {
    let missing = report.missing_tables();
    let tables: Vec<TableRow> = clublink_db::Table::CREATION_ORDER
        .iter()
        .map(|table| {
            let columns = report
                .columns
                .iter()
                .find(|c| c.table == *table)
                .map_or(0, |c| c.columns.len());
            let rows = report
                .row_counts
                .as_ref()
                .and_then(|counts| counts.iter().find(|c| c.table == *table))
                .map_or_else(|| String::from("-"), |c| c.rows.to_string());
            TableRow {
                table: table.to_string(),
                present: yes_no(!missing.contains(table)),
                columns,
                rows,
            }
        })
        .collect();

    let enums: Vec<EnumRow> = report
        .enums
        .iter()
        .map(|e| EnumRow {
            name: e.name.clone(),
            labels: e.labels.join(", "),
        })
        .collect();

    let foreign_keys: Vec<ForeignKeyRow> = report
        .foreign_keys
        .iter()
        .map(|fk| ForeignKeyRow {
            constraint: fk.constraint.clone(),
            from: format!("{}.{}", fk.table, fk.column),
            to: format!("{}.{}", fk.foreign_table, fk.foreign_column),
        })
        .collect();

    let mut out = format!("Server: {}\n\n", report.server_version);
    out.push_str(&render(&tables));
    out.push_str("\n\n");
    out.push_str(&render(&enums));
    out.push_str("\n\n");
    out.push_str(&render(&foreign_keys));

    let missing_enums = report.missing_enums();
    if !missing.is_empty() || !missing_enums.is_empty() {
        out.push_str("\n\nMissing: ");
        let names: Vec<String> = missing
            .iter()
            .map(ToString::to_string)
            .chain(missing_enums)
            .collect();
        out.push_str(&names.join(", "));
    }
    out
}

/// One-paragraph smoke test summary.
pub fn smoke_summary(report: &SmokeReport) -> String {
    format!(
        "Smoke test passed: member {} ({}) -> home gym \"{}\"",
        report.member_id, report.link.email, report.link.gym_name
    )
}

#[cfg(test)]
mod tests {
    use clublink_db::{EnumType, Table};

    use super::*;

    fn report(tables: &[&str]) -> SchemaReport {
        SchemaReport {
            server_version: String::from("PostgreSQL 16.2"),
            tables: tables.iter().map(|t| (*t).to_owned()).collect(),
            enums: vec![EnumType {
                name: String::from("user_role"),
                labels: vec![
                    String::from("admin"),
                    String::from("owner"),
                    String::from("member"),
                ],
            }],
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            row_counts: None,
        }
    }

    #[test]
    fn counts_table_lists_every_row() {
        let out = counts_table(&[
            TableCount {
                table: Table::Users,
                rows: 6,
            },
            TableCount {
                table: Table::Gyms,
                rows: 2,
            },
        ]);
        assert!(out.contains("users"));
        assert!(out.contains("gyms"));
        assert!(out.contains('6'));
    }

    #[test]
    fn schema_report_names_missing_items() {
        let out = schema_report(&report(&["users"]));
        assert!(out.contains("PostgreSQL 16.2"));
        assert!(out.contains("admin, owner, member"));
        assert!(out.contains("Missing: "));
        assert!(out.contains("access_codes"));
        assert!(out.contains("visit_status"));
    }
}
