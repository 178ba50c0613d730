use crate::report::{ErrorReport, Mechanism};

/// Attaches capture-origin metadata to the report's exception record.
///
/// An exception record is created when the report has none. Fields already
/// present on the record's mechanism are never overwritten, so tagging twice
/// keeps the first value.
pub fn add_exception_mechanism(report: &mut ErrorReport, fields: &Mechanism) {
    report
        .exception_mut()
        .mechanism
        .get_or_insert_with(Mechanism::new)
        .merge_missing(fields);
}
