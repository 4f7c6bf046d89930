//! Statement builders, one module per operation.

pub mod call;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;
pub mod upsert;

/// Comma-join already rendered items.
pub(crate) fn list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
