//! Roster membership set: idempotent, order-independent add/remove keyed by
//! `account_id`. Pure collection logic; persistence is the caller's concern.

use aula_db::models::Member;

/// Inserts a fresh `{account_id, final_grade: 0}` entry for every candidate
/// not already enrolled. Candidates that are already members are skipped
/// without touching their grade.
pub fn add_members(members: &mut Vec<Member>, account_ids: &[String]) {
    for account_id in account_ids {
        if !members.iter().any(|m| &m.account_id == account_id) {
            members.push(Member {
                account_id: account_id.clone(),
                final_grade: 0.0,
            });
        }
    }
}

/// Removes every candidate that is enrolled; absent candidates are skipped.
pub fn remove_members(members: &mut Vec<Member>, account_ids: &[String]) {
    members.retain(|m| !account_ids.contains(&m.account_id));
}
