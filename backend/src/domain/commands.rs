//! Domain-level command and query types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API; a transport layer maps the DTOs in the
//! `shared` crate onto these internal types.

pub mod journal {
    use anyhow::{Context, Result};
    use chrono::NaiveDate;
    use shared::{AdjustmentType, CreateEntryRequest, EntryLineInput};

    use crate::domain::models::journal_entry::JournalEntry;

    /// Input for creating a new journal entry.
    #[derive(Debug, Clone)]
    pub struct CreateEntryCommand {
        pub date: NaiveDate,
        pub description: String,
        pub monthly_period_id: String,
        pub is_adjustment: bool,
        pub adjustment_type: Option<AdjustmentType>,
        pub adjusted_entry_id: Option<String>,
        pub lines: Vec<EntryLineInput>,
    }

    impl CreateEntryCommand {
        /// Map the wire-level request onto the domain command. The only
        /// parsing step is the date; everything else carries over.
        pub fn from_request(request: CreateEntryRequest) -> Result<Self> {
            let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
                .with_context(|| format!("Invalid entry date '{}'", request.date))?;
            Ok(Self {
                date,
                description: request.description,
                monthly_period_id: request.monthly_period_id,
                is_adjustment: request.is_adjustment,
                adjustment_type: request.adjustment_type,
                adjusted_entry_id: request.adjusted_entry_id,
                lines: request.lines,
            })
        }
    }

    /// Input for editing a pending entry.
    #[derive(Debug, Clone)]
    pub struct UpdateEntryCommand {
        pub entry_id: String,
        pub date: NaiveDate,
        pub description: String,
        pub lines: Vec<EntryLineInput>,
    }

    /// Result of creating or updating an entry. `warnings` carries the
    /// period-gate advisories (previous period, out-of-range date) that did
    /// not block the write but should be shown to the user.
    #[derive(Debug, Clone)]
    pub struct EntryResult {
        pub entry: JournalEntry,
        pub warnings: Vec<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::journal::CreateEntryCommand;
    use shared::CreateEntryRequest;

    #[test]
    fn request_dates_are_parsed_as_plain_calendar_dates() {
        let request = CreateEntryRequest {
            date: "2026-02-28".to_string(),
            description: "Month-end".to_string(),
            monthly_period_id: "mp1".to_string(),
            is_adjustment: false,
            adjustment_type: None,
            adjusted_entry_id: None,
            lines: vec![],
        };
        let command = CreateEntryCommand::from_request(request).unwrap();
        assert_eq!(command.date.to_string(), "2026-02-28");

        let bad = CreateEntryRequest {
            date: "28/02/2026".to_string(),
            description: String::new(),
            monthly_period_id: String::new(),
            is_adjustment: false,
            adjustment_type: None,
            adjusted_entry_id: None,
            lines: vec![],
        };
        assert!(CreateEntryCommand::from_request(bad).is_err());
    }
}
