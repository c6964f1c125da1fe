//! Grade and report-summary computation.
//!
//! Grades come from a descending threshold-band table over a percentage.
//! The table is a value, not inline branching, so every call site (report
//! view, document export, per-subject columns) shares the same scale.

/// One band: percentages at or above `min_percent` earn `grade`.
pub struct GradeBand {
    pub min_percent: f64,
    pub grade: &'static str,
}

pub struct GradeScale {
    bands: Vec<GradeBand>,
    fallback: &'static str,
}

impl GradeScale {
    /// The canonical scale. The original system also shipped an
    /// 80/70/60/50/40 variant on one rendering path; the stricter table is
    /// the only one kept.
    pub fn standard() -> Self {
        Self {
            bands: vec![
                GradeBand { min_percent: 90.0, grade: "A+" },
                GradeBand { min_percent: 80.0, grade: "A" },
                GradeBand { min_percent: 70.0, grade: "B" },
                GradeBand { min_percent: 60.0, grade: "C" },
                GradeBand { min_percent: 50.0, grade: "D" },
            ],
            fallback: "F",
        }
    }

    pub fn grade_for(&self, percentage: f64) -> &'static str {
        self.bands
            .iter()
            .find(|band| percentage >= band.min_percent)
            .map(|band| band.grade)
            .unwrap_or(self.fallback)
    }

    /// Remark is a pure function of the grade.
    pub fn remark_for(&self, grade: &str) -> &'static str {
        match grade {
            "A+" => "Excellent",
            "A" => "Very Good",
            "B" => "Good",
            "C" | "D" => "Needs Improvement",
            _ => "Unsatisfactory",
        }
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkEntry {
    pub max: f64,
    pub obtained: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkSummary {
    pub total_max: f64,
    pub total_obtained: f64,
    pub percentage: f64,
    pub grade: &'static str,
    pub remark: &'static str,
}

/// Aggregate a mark list into totals, percentage, grade and remark.
///
/// Total with no exceptions: an empty list (or all-zero maxima) yields 0%
/// rather than a division error. Obtained values above the maximum are not
/// clamped; out-of-range input propagates to an out-of-range percentage.
pub fn summarize(marks: &[MarkEntry], scale: &GradeScale) -> MarkSummary {
    let total_max: f64 = marks.iter().map(|m| m.max).sum();
    let total_obtained: f64 = marks.iter().map(|m| m.obtained).sum();

    let percentage = if total_max > 0.0 {
        (total_obtained / total_max) * 100.0
    } else {
        0.0
    };

    let grade = scale.grade_for(percentage);

    MarkSummary {
        total_max,
        total_obtained,
        percentage,
        grade,
        remark: scale.remark_for(grade),
    }
}

/// Grade for a single subject, from its own percentage.
pub fn subject_grade(mark: MarkEntry, scale: &GradeScale) -> &'static str {
    let percentage = if mark.max > 0.0 {
        (mark.obtained / mark.max) * 100.0
    } else {
        0.0
    };
    scale.grade_for(percentage)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> GradeScale {
        GradeScale::standard()
    }

    #[test]
    fn test_single_subject_a_plus() {
        let summary = summarize(
            &[MarkEntry { max: 100.0, obtained: 95.0 }],
            &scale(),
        );
        assert_eq!(summary.total_max, 100.0);
        assert_eq!(summary.total_obtained, 95.0);
        assert_eq!(summary.percentage, 95.0);
        assert_eq!(summary.grade, "A+");
        assert_eq!(summary.remark, "Excellent");
    }

    #[test]
    fn test_two_subjects_failing() {
        let summary = summarize(
            &[
                MarkEntry { max: 50.0, obtained: 20.0 },
                MarkEntry { max: 50.0, obtained: 20.0 },
            ],
            &scale(),
        );
        assert_eq!(summary.total_max, 100.0);
        assert_eq!(summary.total_obtained, 40.0);
        assert_eq!(summary.percentage, 40.0);
        assert_eq!(summary.grade, "F");
        assert_eq!(summary.remark, "Unsatisfactory");
    }

    #[test]
    fn test_empty_marks_is_zero_percent_f() {
        let summary = summarize(&[], &scale());
        assert_eq!(summary.percentage, 0.0);
        assert_eq!(summary.grade, "F");
    }

    #[test]
    fn test_zero_max_marks_is_zero_percent() {
        let summary = summarize(
            &[MarkEntry { max: 0.0, obtained: 10.0 }],
            &scale(),
        );
        assert_eq!(summary.percentage, 0.0);
        assert_eq!(summary.grade, "F");
    }

    #[test]
    fn test_out_of_range_obtained_propagates() {
        // No clamping: obtained > max produces > 100%.
        let summary = summarize(
            &[MarkEntry { max: 50.0, obtained: 75.0 }],
            &scale(),
        );
        assert_eq!(summary.percentage, 150.0);
        assert_eq!(summary.grade, "A+");
    }

    #[test]
    fn test_band_edges() {
        let s = scale();
        assert_eq!(s.grade_for(90.0), "A+");
        assert_eq!(s.grade_for(89.9), "A");
        assert_eq!(s.grade_for(80.0), "A");
        assert_eq!(s.grade_for(70.0), "B");
        assert_eq!(s.grade_for(60.0), "C");
        assert_eq!(s.grade_for(50.0), "D");
        assert_eq!(s.grade_for(49.9), "F");
        assert_eq!(s.grade_for(0.0), "F");
    }

    #[test]
    fn test_remarks_keyed_to_grade() {
        let s = scale();
        assert_eq!(s.remark_for("A+"), "Excellent");
        assert_eq!(s.remark_for("A"), "Very Good");
        assert_eq!(s.remark_for("B"), "Good");
        assert_eq!(s.remark_for("C"), "Needs Improvement");
        assert_eq!(s.remark_for("D"), "Needs Improvement");
        assert_eq!(s.remark_for("F"), "Unsatisfactory");
    }

    #[test]
    fn test_subject_grade_is_independent_of_aggregate() {
        let s = scale();
        // Aggregate of 60% (C) but individual subjects grade on their own.
        let strong = MarkEntry { max: 100.0, obtained: 95.0 };
        let weak = MarkEntry { max: 100.0, obtained: 25.0 };
        assert_eq!(subject_grade(strong, &s), "A+");
        assert_eq!(subject_grade(weak, &s), "F");
        let aggregate = summarize(&[strong, weak], &s);
        assert_eq!(aggregate.grade, "C");
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let marks = [
            MarkEntry { max: 100.0, obtained: 72.0 },
            MarkEntry { max: 50.0, obtained: 41.0 },
        ];
        let first = summarize(&marks, &scale());
        let second = summarize(&marks, &scale());
        assert_eq!(first, second);
    }
}
