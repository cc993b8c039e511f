use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// --- Offers ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OfferStatus {
    #[default]
    #[serde(rename = "To Apply")]
    ToApply,
    Applied,
    Interview,
    Offer,
    Rejected,
    #[serde(rename = "To Relaunch")]
    ToRelaunch,
    #[serde(rename = "No Response")]
    NoResponse,
}

/// Display colors for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusColors {
    pub color: &'static str,
    pub background: &'static str,
    pub border: &'static str,
}

impl OfferStatus {
    /// All statuses in board order.
    pub const ALL: [OfferStatus; 7] = [
        OfferStatus::ToApply,
        OfferStatus::Applied,
        OfferStatus::ToRelaunch,
        OfferStatus::NoResponse,
        OfferStatus::Interview,
        OfferStatus::Offer,
        OfferStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::ToApply => "To Apply",
            OfferStatus::Applied => "Applied",
            OfferStatus::Interview => "Interview",
            OfferStatus::Offer => "Offer",
            OfferStatus::Rejected => "Rejected",
            OfferStatus::ToRelaunch => "To Relaunch",
            OfferStatus::NoResponse => "No Response",
        }
    }

    /// User-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            OfferStatus::ToApply => "À postuler",
            OfferStatus::Applied => "En attente",
            OfferStatus::ToRelaunch => "À relancer",
            OfferStatus::NoResponse => "Sans réponse",
            OfferStatus::Interview => "Entretien",
            OfferStatus::Offer => "Offre reçue",
            OfferStatus::Rejected => "Refusé",
        }
    }

    pub fn colors(&self) -> StatusColors {
        let (color, background) = match self {
            OfferStatus::ToApply => ("#4d5457ff", "rgba(99, 110, 114, 0.2)"),
            OfferStatus::Applied => ("#0056b3", "rgba(0, 87, 179, 0.2)"),
            OfferStatus::ToRelaunch => ("#e67e22", "rgba(230, 126, 34, 0.2)"),
            OfferStatus::NoResponse => ("#754600ff", "rgba(117, 70, 0, 0.2)"),
            OfferStatus::Interview => ("#ffbb00ff", "rgba(255, 196, 0, 0.18)"),
            OfferStatus::Offer => ("#00997aff", "rgba(0, 153, 122, 0.2)"),
            OfferStatus::Rejected => ("#d63031", "rgba(214, 48, 49, 0.2)"),
        };
        let border = match self {
            OfferStatus::ToApply => "2px solid #4d5457ff",
            OfferStatus::Applied => "2px solid #0056b3",
            OfferStatus::ToRelaunch => "2px solid #e67e22",
            OfferStatus::NoResponse => "2px solid #754600ff",
            OfferStatus::Interview => "2px solid #ffbb00ff",
            OfferStatus::Offer => "2px solid #00997aff",
            OfferStatus::Rejected => "2px solid #d63031",
        };
        StatusColors {
            color,
            background,
            border,
        }
    }

    /// Position in [`OfferStatus::ALL`].
    pub fn index(&self) -> usize {
        match self {
            OfferStatus::ToApply => 0,
            OfferStatus::Applied => 1,
            OfferStatus::ToRelaunch => 2,
            OfferStatus::NoResponse => 3,
            OfferStatus::Interview => 4,
            OfferStatus::Offer => 5,
            OfferStatus::Rejected => 6,
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "toapply" => Ok(OfferStatus::ToApply),
            "applied" => Ok(OfferStatus::Applied),
            "interview" => Ok(OfferStatus::Interview),
            "offer" => Ok(OfferStatus::Offer),
            "rejected" => Ok(OfferStatus::Rejected),
            "torelaunch" => Ok(OfferStatus::ToRelaunch),
            "noresponse" => Ok(OfferStatus::NoResponse),
            _ => Err(format!(
                "unknown status '{}' (expected one of: to-apply, applied, interview, offer, rejected, to-relaunch, no-response)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: OfferStatus,
    #[serde(with = "iso_date")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl StatusHistoryEntry {
    pub fn new(status: OfferStatus, date: DateTime<Utc>) -> Self {
        Self {
            status,
            date,
            details: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewType {
    #[serde(rename = "Préqual")]
    Prequal,
    #[serde(rename = "Entretien Physique")]
    OnSite,
    #[serde(rename = "Entretien Téléphonique")]
    Phone,
    #[serde(rename = "Entretien Visio")]
    Video,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Prequal => "Préqual",
            InterviewType::OnSite => "Entretien Physique",
            InterviewType::Phone => "Entretien Téléphonique",
            InterviewType::Video => "Entretien Visio",
        }
    }

    /// Label used when titling follow-up tasks.
    pub fn task_label(&self) -> &'static str {
        match self {
            InterviewType::Prequal => "Préqualification",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "préqual" | "prequal" | "préqualification" | "prequalification" => {
                Ok(InterviewType::Prequal)
            }
            "entretienphysique" | "onsite" | "physical" => Ok(InterviewType::OnSite),
            "entretientéléphonique" | "entretientelephonique" | "phone" => Ok(InterviewType::Phone),
            "entretienvisio" | "visio" | "video" => Ok(InterviewType::Video),
            _ => Err(format!(
                "unknown interview type '{}' (expected prequal, onsite, phone or video)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    #[serde(with = "iso_date")]
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: InterviewType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Interview {
    pub fn new(date: DateTime<Utc>, kind: InterviewType) -> Self {
        Self {
            date,
            kind,
            details: None,
        }
    }

    /// Two interviews are the same meeting when date and type match.
    pub fn same_slot(&self, other: &Interview) -> bool {
        self.date == other.date && self.kind == other.kind
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Company-level fields, denormalized onto every offer of the company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOffer {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub status: OfferStatus,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(with = "iso_date")]
    pub date_added: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruitment_process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub others: Option<String>,
    #[serde(default)]
    pub company_info: CompanyInfo,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
    #[serde(default)]
    pub interviews: Vec<Interview>,
    // Mirrors the next (or latest) interview for list views.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_date::option")]
    pub interview_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_type: Option<InterviewType>,
}

impl JobOffer {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        status: OfferStatus,
        date_added: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            status,
            date_added,
            ..Default::default()
        }
    }

    /// "title - company - status" label used to link tasks back to offers.
    pub fn task_reference(&self) -> String {
        format!("{} - {} - {}", self.title, self.company, self.status.label())
    }

    /// History sorted most recent first.
    pub fn sorted_history(&self) -> Vec<StatusHistoryEntry> {
        let mut history = self.status_history.clone();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        history
    }

    /// Interviews at or after `now`, soonest first.
    pub fn upcoming_interviews(&self, now: DateTime<Utc>) -> Vec<Interview> {
        let mut upcoming: Vec<Interview> = self
            .interviews
            .iter()
            .filter(|i| i.date >= now)
            .cloned()
            .collect();
        upcoming.sort_by(|a, b| a.date.cmp(&b.date));
        upcoming
    }

    /// Interviews before `now`, most recent first.
    pub fn past_interviews(&self, now: DateTime<Utc>) -> Vec<Interview> {
        let mut past: Vec<Interview> = self
            .interviews
            .iter()
            .filter(|i| i.date < now)
            .cloned()
            .collect();
        past.sort_by(|a, b| b.date.cmp(&a.date));
        past
    }
}

// --- Tasks ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "a_faire")]
    Todo,
    #[serde(rename = "en_cours")]
    InProgress,
    #[serde(rename = "termine")]
    Done,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "À faire",
            TaskStatus::InProgress => "En cours",
            TaskStatus::Done => "Terminé",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "todo" | "afaire" => Ok(TaskStatus::Todo),
            "inprogress" | "encours" => Ok(TaskStatus::InProgress),
            "done" | "termine" => Ok(TaskStatus::Done),
            _ => Err(format!(
                "unknown task status '{}' (expected todo, in-progress or done)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskPriority {
    #[serde(rename = "haute")]
    High,
    #[default]
    #[serde(rename = "moyenne")]
    Medium,
    #[serde(rename = "faible")]
    Low,
}

impl TaskPriority {
    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::High => "Haute",
            TaskPriority::Medium => "Moyenne",
            TaskPriority::Low => "Faible",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "high" | "haute" => Ok(TaskPriority::High),
            "medium" | "moyenne" => Ok(TaskPriority::Medium),
            "low" | "faible" => Ok(TaskPriority::Low),
            _ => Err(format!(
                "unknown priority '{}' (expected high, medium or low)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(with = "iso_date")]
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_offers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Task {
    pub fn new(title: impl Into<String>, due_date: DateTime<Utc>, priority: TaskPriority) -> Self {
        Self {
            id: 0,
            title: title.into(),
            due_date,
            completed: false,
            status: TaskStatus::Todo,
            priority,
            related_offers: Vec::new(),
            link: None,
        }
    }

    /// Sets the status and keeps `completed` in step with it.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed = status == TaskStatus::Done;
    }
}

// --- Users ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    Email,
    Google,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password: String, // plaintext; credentials here are a mock
    #[serde(default)]
    pub auth_method: AuthMethod,
    #[serde(with = "iso_date")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

/// Partial profile update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
}

// --- Persisted dataset ---

/// Everything stored for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user: User,
    #[serde(default)]
    pub offers: Vec<JobOffer>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub current_user_id: Option<String>,
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
}

/// Fields dropped from per-user records by later versions.
const OBSOLETE_USER_FIELDS: &[&str] = &["theme"];

impl Dataset {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses an exported dataset, dropping obsolete fields on the way in.
    pub fn from_json(raw: &str) -> serde_json::Result<Dataset> {
        let mut value: serde_json::Value = serde_json::from_str(raw)?;
        if let Some(users) = value.get_mut("users").and_then(|u| u.as_object_mut()) {
            for record in users.values_mut() {
                strip_obsolete_user_fields(record);
                if let Some(user) = record.get_mut("user") {
                    strip_obsolete_user_fields(user);
                }
            }
        }
        serde_json::from_value(value)
    }
}

/// Removes obsolete keys from a user-level JSON object. Returns true if any were present.
pub fn strip_obsolete_user_fields(value: &mut serde_json::Value) -> bool {
    let Some(obj) = value.as_object_mut() else {
        return false;
    };
    let mut changed = false;
    for field in OBSOLETE_USER_FIELDS {
        changed |= obj.remove(*field).is_some();
    }
    changed
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    iso_date::parse(raw)
}

fn normalize_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '\''))
        .collect()
}

pub(crate) mod iso_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            date: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw))),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_parses_loose_spellings() {
        assert_eq!("to-apply".parse::<OfferStatus>(), Ok(OfferStatus::ToApply));
        assert_eq!("To Relaunch".parse::<OfferStatus>(), Ok(OfferStatus::ToRelaunch));
        assert_eq!("no_response".parse::<OfferStatus>(), Ok(OfferStatus::NoResponse));
        assert!("hired".parse::<OfferStatus>().is_err());
    }

    #[test]
    fn status_serializes_with_display_names() {
        let json = serde_json::to_string(&OfferStatus::ToApply).unwrap();
        assert_eq!(json, "\"To Apply\"");
        let back: OfferStatus = serde_json::from_str("\"No Response\"").unwrap();
        assert_eq!(back, OfferStatus::NoResponse);
    }

    #[test]
    fn status_colors_share_the_border_hue() {
        let applied = OfferStatus::Applied.colors();
        assert_eq!(applied.color, "#0056b3");
        assert_eq!(applied.background, "rgba(0, 87, 179, 0.2)");
        for status in OfferStatus::ALL {
            let colors = status.colors();
            assert_eq!(colors.border, format!("2px solid {}", colors.color));
        }
    }

    #[test]
    fn status_index_matches_all_order() {
        for (i, status) in OfferStatus::ALL.iter().enumerate() {
            assert_eq!(status.index(), i);
        }
    }

    #[test]
    fn prequal_task_label_is_spelled_out() {
        assert_eq!(InterviewType::Prequal.task_label(), "Préqualification");
        assert_eq!(InterviewType::Video.task_label(), "Entretien Visio");
        assert_eq!("Préqual".parse::<InterviewType>(), Ok(InterviewType::Prequal));
    }

    #[test]
    fn dates_accept_date_only_strings() {
        let parsed = parse_date("2023-10-25").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 10, 25, 0, 0, 0).unwrap());
        let parsed = parse_date("2023-10-25T08:30:00.000Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 10, 25, 8, 30, 0).unwrap());
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn offer_dates_serialize_as_iso_strings() {
        let date = Utc.with_ymd_and_hms(2023, 10, 25, 0, 0, 0).unwrap();
        let offer = JobOffer::new("Dev", "Acme", OfferStatus::ToApply, date);
        let value = serde_json::to_value(&offer).unwrap();
        assert_eq!(value["dateAdded"], "2023-10-25T00:00:00.000Z");
        assert_eq!(value["status"], "To Apply");
        assert!(value.get("interviewDate").is_none());
    }

    #[test]
    fn task_status_drives_completed() {
        let due = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut task = Task::new("CV", due, TaskPriority::Low);
        task.set_status(TaskStatus::Done);
        assert!(task.completed);
        task.set_status(TaskStatus::InProgress);
        assert!(!task.completed);
    }

    #[test]
    fn dataset_import_drops_theme() {
        let raw = r#"{
            "currentUserId": "u1",
            "users": {
                "u1": {
                    "theme": "dark",
                    "user": {
                        "id": "u1", "fullName": "Alice", "email": "a@x.com",
                        "password": "pw1", "createdAt": "2024-01-01", "theme": "light"
                    },
                    "offers": [],
                    "tasks": []
                }
            }
        }"#;
        let dataset = Dataset::from_json(raw).unwrap();
        assert_eq!(dataset.current_user_id.as_deref(), Some("u1"));
        let json = dataset.to_json_pretty().unwrap();
        assert!(!json.contains("theme"));
    }

    #[test]
    fn interviews_split_around_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut offer = JobOffer::new("Dev", "Acme", OfferStatus::Interview, now);
        offer.interviews = vec![
            Interview::new(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(), InterviewType::Phone),
            Interview::new(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(), InterviewType::Video),
            Interview::new(Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap(), InterviewType::OnSite),
            Interview::new(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(), InterviewType::Prequal),
        ];
        let upcoming = offer.upcoming_interviews(now);
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].kind, InterviewType::OnSite);
        let past = offer.past_interviews(now);
        assert_eq!(past[0].kind, InterviewType::Phone);
        assert_eq!(past[1].kind, InterviewType::Prequal);
    }
}
