use thiserror::Error;

use crate::constants::OccurrenceId;

#[derive(Error, Debug)]
pub enum MigratrackError {
    #[error("Missing input file: {0}")]
    MissingSource(String),

    #[error("Malformed record at line {line}: {detail}")]
    MalformedRecord { line: u64, detail: String },

    #[error("Unable to parse date {value:?} of occurrence {occurrence_id}")]
    TimestampParse {
        occurrence_id: OccurrenceId,
        value: String,
    },

    #[error("Occurrence {occurrence_id} mixes a timezone-aware date with a naive one")]
    IncomparableTimestamps { occurrence_id: OccurrenceId },

    #[error("Date {month:02}-{day:02} does not exist in synthetic year {year}")]
    InvalidSyntheticDate { year: i32, month: u32, day: u32 },

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Invalid animation parameters: {0}")]
    InvalidParams(String),

    #[error("Drawing backend error: {0}")]
    Render(String),

    #[error("Video encoder error: {0}")]
    Encoder(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for MigratrackError {
    fn eq(&self, other: &Self) -> bool {
        use MigratrackError::*;
        match (self, other) {
            (MissingSource(a), MissingSource(b)) => a == b,
            (
                MalformedRecord {
                    line: la,
                    detail: da,
                },
                MalformedRecord {
                    line: lb,
                    detail: db,
                },
            ) => la == lb && da == db,
            (
                TimestampParse {
                    occurrence_id: ia,
                    value: va,
                },
                TimestampParse {
                    occurrence_id: ib,
                    value: vb,
                },
            ) => ia == ib && va == vb,
            (
                IncomparableTimestamps { occurrence_id: a },
                IncomparableTimestamps { occurrence_id: b },
            ) => a == b,
            (
                InvalidSyntheticDate {
                    year: ya,
                    month: ma,
                    day: da,
                },
                InvalidSyntheticDate {
                    year: yb,
                    month: mb,
                    day: db,
                },
            ) => ya == yb && ma == mb && da == db,
            (EmptyDataset(a), EmptyDataset(b)) => a == b,
            (InvalidParams(a), InvalidParams(b)) => a == b,
            (Render(a), Render(b)) => a == b,
            (Encoder(a), Encoder(b)) => a == b,

            // io errors are not comparable: equal when same variant
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
