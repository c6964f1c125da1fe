use serde::{Deserialize, Serialize};

// ============================================================================
// Backend Entity Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PaymentOption {
    #[serde(rename = "advance-payment")]
    AdvancePayment,
    #[serde(rename = "after-month-payment")]
    AfterMonthPayment,
}

impl PaymentOption {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentOption::AdvancePayment => "Advance Payment",
            PaymentOption::AfterMonthPayment => "After Month Payment",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            PaymentOption::AdvancePayment => PaymentOption::AfterMonthPayment,
            PaymentOption::AfterMonthPayment => PaymentOption::AdvancePayment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PaymentMode {
    Cash,
    Online,
}

impl PaymentMode {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Online => "Online",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            PaymentMode::Cash => PaymentMode::Online,
            PaymentMode::Online => PaymentMode::Cash,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub std_id: String,
    pub std_name: String,
    pub father_name: String,
    pub phone_no: String,
    pub class_study: u32,
    pub group_name: String,
    pub classes_per_week: u32,
    pub payment_option: PaymentOption,
    pub monthly_fee: f64,
}

/// Reference shape sent inside write payloads: only the owning id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub std_id: String,
}

/// One attendance record as returned by `/attendance/date/{date}` and
/// `/attendance/student/{id}`. The nested student is absent in per-student
/// history responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub att_id: Option<i64>,
    #[serde(default)]
    pub student: Option<Student>,
    pub is_present: i64,
    pub date: String,
}

/// Body for `POST /attendance/add/{stdId}` and `PUT /attendance/update/{attId}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceBody {
    pub is_present: i64,
    pub date: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees_id: Option<i64>,
    pub student: Student,
    pub amount: f64,
    pub month: String,
    pub date: String,
    pub payment_mode: PaymentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_by: Option<String>,
}

/// Body for `POST /fees/add` and `PUT /fees/update/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBody {
    pub student: StudentRef,
    pub amount: f64,
    pub month: String,
    pub date: String,
    pub payment_mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_id: Option<i64>,
    pub student: Student,
    #[serde(default)]
    pub report_marks: Vec<ReportMark>,
    pub month: String,
    pub year: String,
    pub date: String,
    #[serde(default)]
    pub exam_name: String,
}

/// One subject row on a report card. `grade` and `percentage` are derived
/// client-side for display; the backend may echo them back or omit them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_marks_id: Option<i64>,
    pub subject_name: String,
    pub max_marks: f64,
    pub total_marks: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

/// Body for `POST /report/add` and `PUT /report/update/{id}`. Marks travel
/// embedded in the report payload; a mark with `repMarksId` set is an update
/// of that row, one without is a new row.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBody {
    pub student: StudentRef,
    pub month: String,
    pub year: String,
    pub date: String,
    pub exam_name: String,
    pub report_marks: Vec<ReportMark>,
}

// ============================================================================
// Client-side validation
// ============================================================================

/// Phone numbers are 11 digits and start with 0 (e.g. 03XXXXXXXXX).
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 11 && phone.starts_with('0') && phone.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("03001234567"));
        assert!(!is_valid_phone("3001234567")); // missing leading zero
        assert!(!is_valid_phone("030012345678")); // too long
        assert!(!is_valid_phone("0300123456a"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_student_wire_shape() {
        let json = r#"{
            "stdId": "S-101",
            "stdName": "Ayesha Khan",
            "fatherName": "Imran Khan",
            "phoneNo": "03001234567",
            "classStudy": 10,
            "groupName": "Science",
            "classesPerWeek": 5,
            "paymentOption": "advance-payment",
            "monthlyFee": 2000.0
        }"#;

        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.std_id, "S-101");
        assert_eq!(student.payment_option, PaymentOption::AdvancePayment);
        assert_eq!(student.monthly_fee, 2000.0);

        let back = serde_json::to_value(&student).unwrap();
        assert_eq!(back["stdName"], "Ayesha Khan");
        assert_eq!(back["paymentOption"], "advance-payment");
    }

    #[test]
    fn test_attendance_entry_without_nested_student() {
        // Per-student history rows carry no nested student object.
        let json = r#"{"attId": 7, "isPresent": 1, "date": "2024-03-07"}"#;
        let entry: AttendanceEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.att_id, Some(7));
        assert!(entry.student.is_none());
        assert_eq!(entry.is_present, 1);
    }

    #[test]
    fn test_fee_body_omits_absent_fields() {
        let body = FeeBody {
            student: StudentRef {
                std_id: "S-101".to_string(),
            },
            amount: 2000.0,
            month: "March".to_string(),
            date: "2024-03-07".to_string(),
            payment_mode: PaymentMode::Cash,
            issued_by: None,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["student"]["stdId"], "S-101");
        assert_eq!(value["paymentMode"], "Cash");
        assert!(value.get("issuedBy").is_none());
    }

    #[test]
    fn test_report_mark_id_controls_serialization() {
        let new_mark = ReportMark {
            rep_marks_id: None,
            subject_name: "Mathematics".to_string(),
            max_marks: 100.0,
            total_marks: 85.0,
            grade: None,
            percentage: None,
        };
        let value = serde_json::to_value(&new_mark).unwrap();
        assert!(value.get("repMarksId").is_none());

        let existing = ReportMark {
            rep_marks_id: Some(42),
            ..new_mark
        };
        let value = serde_json::to_value(&existing).unwrap();
        assert_eq!(value["repMarksId"], 42);
    }
}
