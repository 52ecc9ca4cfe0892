use crate::api::MigrationTarget;

/// First target whose base channel label contains `desired`, ignoring case
///
/// No fuzzy matching: a target either contains the substring or it does not.
pub fn select_target<'a>(
    targets: &'a [MigrationTarget],
    desired: &str,
) -> Option<&'a MigrationTarget> {
    let desired = desired.to_lowercase();
    targets
        .iter()
        .find(|target| target.base_channel_label.to_lowercase().contains(&desired))
}

/// Labels of every candidate, in the order the server returned them
pub fn candidate_labels(targets: &[MigrationTarget]) -> Vec<String> {
    targets
        .iter()
        .map(|target| target.base_channel_label.clone())
        .collect()
}
