use rusqlite::types::Type;
use rusqlite::{Connection, params};
use std::path::Path;

use crate::analysis::Aggregator;
use crate::error::Result;
use crate::models::{
    Category, ClassificationRecord, ClassifiedComment, FeedbackReport, Sentiment, StoredRunSummary,
};

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS analysis_runs (
                id INTEGER PRIMARY KEY,
                product_name TEXT NOT NULL,
                generated_at TEXT NOT NULL,
                model TEXT NOT NULL,
                total INTEGER NOT NULL,
                failed INTEGER NOT NULL,
                executive_summary TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS classifications (
                id INTEGER PRIMARY KEY,
                run_id INTEGER NOT NULL REFERENCES analysis_runs(id),
                position INTEGER NOT NULL,
                comment TEXT NOT NULL,
                sentiment TEXT NOT NULL,
                category TEXT NOT NULL,
                short_summary TEXT NOT NULL,
                UNIQUE(run_id, position)
            );

            CREATE INDEX IF NOT EXISTS idx_classifications_run_id ON classifications(run_id);
            "#,
        )?;

        Ok(())
    }

    /// Persists a report and returns its run id.
    pub fn save_report(&self, report: &FeedbackReport) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO analysis_runs (product_name, generated_at, model, total, failed, executive_summary)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                report.product_name,
                report.generated_at.to_rfc3339(),
                report.model,
                report.statistics.total as i64,
                report.statistics.failed as i64,
                report.executive_summary,
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO classifications (run_id, position, comment, sentiment, category, short_summary)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;

            for (position, entry) in report.entries.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    position as i64,
                    entry.comment,
                    entry.classification.sentiment.to_string(),
                    entry.classification.category.to_string(),
                    entry.classification.short_summary,
                ])?;
            }
        }

        tx.commit()?;
        Ok(run_id)
    }

    pub fn get_report(&self, run_id: i64) -> Result<Option<FeedbackReport>> {
        let result = self.conn.query_row(
            r#"
            SELECT product_name, generated_at, model, executive_summary
            FROM analysis_runs
            WHERE id = ?1
            "#,
            params![run_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?, // product_name
                    parse_timestamp(1, &row.get::<_, String>(1)?)?, // generated_at
                    row.get::<_, String>(2)?, // model
                    row.get::<_, String>(3)?, // executive_summary
                ))
            },
        );

        match result {
            Ok((product_name, generated_at, model, executive_summary)) => {
                let entries = self.get_entries(run_id)?;
                let records: Vec<_> = entries.iter().map(|e| e.classification.clone()).collect();
                let statistics = Aggregator::new().statistics(&records);

                Ok(Some(FeedbackReport {
                    product_name,
                    generated_at,
                    model,
                    entries,
                    statistics,
                    executive_summary,
                }))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_entries(&self, run_id: i64) -> Result<Vec<ClassifiedComment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT comment, sentiment, category, short_summary
            FROM classifications
            WHERE run_id = ?1
            ORDER BY position ASC
            "#,
        )?;

        let entries = stmt.query_map(params![run_id], |row| {
            let comment: String = row.get(0)?;
            let sentiment_str: String = row.get(1)?;
            let category_str: String = row.get(2)?;
            let short_summary: String = row.get(3)?;

            let sentiment = parse_label(1, &sentiment_str, Sentiment::from_label)?;
            let category = parse_label(2, &category_str, Category::from_label)?;

            Ok(ClassifiedComment {
                comment,
                classification: ClassificationRecord::new(sentiment, category, short_summary),
            })
        })?;

        entries.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn list_reports(&self) -> Result<Vec<StoredRunSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, product_name, generated_at, total, failed FROM analysis_runs ORDER BY generated_at DESC, id DESC",
        )?;

        let runs = stmt.query_map([], |row| {
            let generated_at: String = row.get(2)?;
            Ok(StoredRunSummary {
                id: row.get(0)?,
                product_name: row.get(1)?,
                generated_at: parse_timestamp(2, &generated_at)?,
                total: row.get::<_, i64>(3)? as usize,
                failed: row.get::<_, i64>(4)? as usize,
            })
        })?;

        runs.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn parse_label<T>(column: usize, value: &str, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    parse(value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Text,
            format!("unknown label: {}", value).into(),
        )
    })
}
