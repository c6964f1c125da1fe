//! Create-vs-update reconciliation for locally edited records.
//!
//! Every save path (attendance day sheets, fee receipts, report cards) edits
//! records that may or may not already exist on the backend. The policy is
//! in one place: a record carrying a prior server identifier becomes an
//! `Update` against that id, one without becomes a `Create`. Callers issue
//! the resulting batch concurrently and treat it as succeeded only if every
//! operation succeeds.

use crate::models::{AttendanceBody, FeeBody, ReportBody, ReportMark};

/// A single backend write, tagged with its dispatch target.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation<T> {
    Create(T),
    Update(i64, T),
}

impl<T> Operation<T> {
    pub fn is_create(&self) -> bool {
        matches!(self, Operation::Create(_))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Operation::Update(_, _))
    }
}

/// A locally edited record that can be planned into an [`Operation`].
pub trait Reconcilable {
    type Payload;

    /// The server-assigned identifier from a previously persisted fetch, if
    /// this draft modifies an existing record.
    fn record_id(&self) -> Option<i64>;

    fn into_payload(self) -> Self::Payload;
}

/// Plan a batch of drafts into create/update operations.
///
/// An empty draft set yields an empty plan; callers surface that as an
/// informational no-op, not a failure. Operation order carries no meaning;
/// records are keyed by distinct identifiers, so the batch may be issued
/// concurrently.
pub fn plan<R: Reconcilable>(drafts: impl IntoIterator<Item = R>) -> Vec<Operation<R::Payload>> {
    drafts
        .into_iter()
        .map(|draft| match draft.record_id() {
            Some(id) => Operation::Update(id, draft.into_payload()),
            None => Operation::Create(draft.into_payload()),
        })
        .collect()
}

// ============================================================================
// Draft types per record family
// ============================================================================

/// One student's mark for one day on the attendance sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceDraft {
    pub std_id: String,
    /// Identifier of the existing record for this (student, date), if any.
    pub att_id: Option<i64>,
    /// 1 = present, 0 = absent. Unmarked students never become drafts.
    pub status: i64,
    pub date: String,
}

/// Payload for an attendance write. Creates route through the student id
/// (`POST /attendance/add/{stdId}`), updates through the record id.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceUpsert {
    pub std_id: String,
    pub body: AttendanceBody,
}

impl Reconcilable for AttendanceDraft {
    type Payload = AttendanceUpsert;

    fn record_id(&self) -> Option<i64> {
        self.att_id
    }

    fn into_payload(self) -> AttendanceUpsert {
        AttendanceUpsert {
            std_id: self.std_id,
            body: AttendanceBody {
                is_present: self.status,
                date: self.date,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeeDraft {
    pub fees_id: Option<i64>,
    pub body: FeeBody,
}

impl Reconcilable for FeeDraft {
    type Payload = FeeBody;

    fn record_id(&self) -> Option<i64> {
        self.fees_id
    }

    fn into_payload(self) -> FeeBody {
        self.body
    }
}

#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub rep_id: Option<i64>,
    pub body: ReportBody,
}

impl Reconcilable for ReportDraft {
    type Payload = ReportBody;

    fn record_id(&self) -> Option<i64> {
        self.rep_id
    }

    fn into_payload(self) -> ReportBody {
        self.body
    }
}

// ============================================================================
// Report-mark removal policy
// ============================================================================

/// What happens to persisted subject marks the user removed from the local
/// edit list before an update. The backend deletes nothing on its own, so
/// this is an explicit choice rather than an accident of payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkRemovalPolicy {
    /// Re-append persisted marks missing from the local list, so an update
    /// never sheds rows. The console default.
    Retain,
    /// Send only the local list; rows removed locally are left for the
    /// backend to treat as gone.
    Drop,
}

/// Assemble the mark list for a report update payload.
///
/// `prior` is the mark list from the last fetch of this report. Local marks
/// keep their position; under [`MarkRemovalPolicy::Retain`], persisted marks
/// whose ids no longer appear locally are appended unchanged.
pub fn assemble_marks(
    local: Vec<ReportMark>,
    prior: &[ReportMark],
    policy: MarkRemovalPolicy,
) -> Vec<ReportMark> {
    match policy {
        MarkRemovalPolicy::Drop => local,
        MarkRemovalPolicy::Retain => {
            let mut merged = local;
            for mark in prior {
                let Some(id) = mark.rep_marks_id else {
                    continue;
                };
                let kept = merged.iter().any(|m| m.rep_marks_id == Some(id));
                if !kept {
                    merged.push(mark.clone());
                }
            }
            merged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMode, StudentRef};

    fn attendance_draft(std_id: &str, att_id: Option<i64>, status: i64) -> AttendanceDraft {
        AttendanceDraft {
            std_id: std_id.to_string(),
            att_id,
            status,
            date: "2024-03-07".to_string(),
        }
    }

    fn mark(id: Option<i64>, subject: &str, obtained: f64) -> ReportMark {
        ReportMark {
            rep_marks_id: id,
            subject_name: subject.to_string(),
            max_marks: 100.0,
            total_marks: obtained,
            grade: None,
            percentage: None,
        }
    }

    #[test]
    fn test_prior_id_plans_update() {
        let ops = plan(vec![attendance_draft("S-1", Some(42), 1)]);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            Operation::Update(id, payload) => {
                assert_eq!(*id, 42);
                assert_eq!(payload.body.is_present, 1);
                assert_eq!(payload.body.date, "2024-03-07");
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_id_plans_create() {
        let ops = plan(vec![attendance_draft("S-1", None, 0)]);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            Operation::Create(payload) => {
                assert_eq!(payload.std_id, "S-1");
                assert_eq!(payload.body.is_present, 0);
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_drafts_plan_nothing() {
        let ops = plan(Vec::<AttendanceDraft>::new());
        assert!(ops.is_empty());
    }

    #[test]
    fn test_mixed_batch_splits_by_id() {
        let ops = plan(vec![
            attendance_draft("S-1", None, 1),
            attendance_draft("S-2", Some(7), 0),
            attendance_draft("S-3", None, 1),
        ]);
        assert_eq!(ops.iter().filter(|op| op.is_create()).count(), 2);
        assert_eq!(ops.iter().filter(|op| op.is_update()).count(), 1);
    }

    #[test]
    fn test_save_then_refetch_then_save_again() {
        // First save of a fresh day sheet: everything is a create.
        let drafts = vec![
            attendance_draft("S-1", None, 1),
            attendance_draft("S-2", None, 0),
            attendance_draft("S-3", None, 1),
        ];
        let first = plan(drafts.clone());
        assert!(first.iter().all(Operation::is_create));

        // After a successful save the page re-fetches and the records now
        // carry server ids; the second save is pure updates.
        let refetched: Vec<AttendanceDraft> = drafts
            .into_iter()
            .enumerate()
            .map(|(i, mut d)| {
                d.att_id = Some(100 + i as i64);
                d
            })
            .collect();
        let second = plan(refetched);
        assert!(second.iter().all(Operation::is_update));
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn test_fee_draft_dispatch() {
        let body = FeeBody {
            student: StudentRef { std_id: "S-1".to_string() },
            amount: 2000.0,
            month: "March".to_string(),
            date: "2024-03-07".to_string(),
            payment_mode: PaymentMode::Cash,
            issued_by: None,
        };

        let create = plan(vec![FeeDraft { fees_id: None, body: body.clone() }]);
        assert!(create[0].is_create());

        let update = plan(vec![FeeDraft { fees_id: Some(9), body }]);
        assert!(matches!(update[0], Operation::Update(9, _)));
    }

    #[test]
    fn test_retain_policy_keeps_removed_persisted_marks() {
        let prior = vec![mark(Some(1), "Mathematics", 80.0), mark(Some(2), "English", 70.0)];
        // User removed English locally and added a brand new subject.
        let local = vec![mark(Some(1), "Mathematics", 85.0), mark(None, "Science", 60.0)];

        let merged = assemble_marks(local, &prior, MarkRemovalPolicy::Retain);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].total_marks, 85.0); // local edit wins
        assert_eq!(merged[2].rep_marks_id, Some(2)); // removed row re-appended
    }

    #[test]
    fn test_drop_policy_sends_local_list_only() {
        let prior = vec![mark(Some(1), "Mathematics", 80.0), mark(Some(2), "English", 70.0)];
        let local = vec![mark(Some(1), "Mathematics", 85.0)];

        let merged = assemble_marks(local, &prior, MarkRemovalPolicy::Drop);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].rep_marks_id, Some(1));
    }

    #[test]
    fn test_retain_ignores_prior_marks_without_ids() {
        // A prior mark that never got an id cannot be matched; it is not
        // resurrected.
        let prior = vec![mark(None, "Urdu", 50.0)];
        let merged = assemble_marks(vec![], &prior, MarkRemovalPolicy::Retain);
        assert!(merged.is_empty());
    }
}
