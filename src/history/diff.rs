//! Field-level diff between a stored campaign and an edit candidate

use crate::storage::{Campaign, CampaignFields, ChangeSet, FieldChange};

/// Compare `candidate` against `old`, field by field.
///
/// Only fields present in the candidate are considered; a field the candidate
/// leaves out is "unchanged", never "removed". Values are compared as exact
/// strings.
pub fn compute_diff(old: &Campaign, candidate: &CampaignFields) -> ChangeSet {
    candidate
        .iter()
        .filter(|(field, new)| old.get(*field) != *new)
        .map(|(field, new)| (field, FieldChange::new(old.get(field), new)))
        .collect()
}

/// Diff of every business field between two full records
pub fn diff_records(old: &Campaign, new: &Campaign) -> ChangeSet {
    compute_diff(old, &new.fields())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CampaignField, CampaignId};
    use strum::IntoEnumIterator;

    fn sample() -> Campaign {
        Campaign::new(
            CampaignId::from("c1"),
            &CampaignFields::new()
                .with(CampaignField::Brand, "Acme")
                .with(CampaignField::SaleMonth, "February")
                .with(CampaignField::CampaignName, "Spring Sale")
                .with(CampaignField::StartDate, "2025-02-01")
                .with(CampaignField::EndDate, "2025-02-28"),
        )
    }

    #[test]
    fn test_identical_records_have_empty_diff() {
        let a = sample();
        assert!(diff_records(&a, &a).is_empty());
        assert!(compute_diff(&a, &a.fields()).is_empty());
    }

    #[test]
    fn test_single_field_difference_for_every_field() {
        let a = sample();
        for field in CampaignField::iter() {
            let mut b = a.clone();
            b.set(field, format!("{}-changed", a.get(field)));

            let diff = diff_records(&a, &b);
            assert_eq!(diff.len(), 1, "field {}", field);
            assert_eq!(
                diff[&field],
                FieldChange::new(a.get(field), b.get(field)),
                "field {}",
                field
            );
        }
    }

    #[test]
    fn test_absent_fields_are_not_reported() {
        let a = sample();
        let candidate = CampaignFields::new().with(CampaignField::Brand, "Acme");
        assert!(compute_diff(&a, &candidate).is_empty());
    }

    #[test]
    fn test_clearing_a_field_is_a_change() {
        let a = sample();
        let candidate = CampaignFields::new().with(CampaignField::SaleMonth, "");
        let diff = compute_diff(&a, &candidate);
        assert_eq!(diff[&CampaignField::SaleMonth], FieldChange::new("February", ""));
    }

    #[test]
    fn test_history_identity_and_order_never_compared() {
        let a = sample();
        let mut b = a.clone();
        b.id = CampaignId::from("other");
        b.order_index = a.order_index + 3;
        b.edit_history.push(crate::storage::ChangeEntry {
            editor: "x".into(),
            timestamp: chrono::Utc::now(),
            changes: ChangeSet::new(),
        });
        assert!(diff_records(&a, &b).is_empty());
    }
}
