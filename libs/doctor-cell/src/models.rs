use shared_models::Doctor;
use shared_utils::format::initials;

pub const DEFAULT_SPECIALIZATION: &str = "General Physician";
pub const DEFAULT_EXPERIENCE_YEARS: u32 = 5;
pub const DEFAULT_RATING: &str = "4.5";
pub const DEFAULT_CONSULTATION_FEE: &str = "100";
pub const DEFAULT_CARD_BIO: &str =
    "Experienced medical professional dedicated to providing quality care.";
pub const DEFAULT_DETAILS_BIO: &str = "No bio available.";

/// Doctor fields with every gap filled. Missing or empty values count as
/// gaps, and so does zero years of experience. Rating and fee keep the
/// server's decimal text.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDoctor {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub initials: String,
    pub email: String,
    pub specialization: String,
    pub experience: u32,
    pub rating: String,
    pub consultation_fee: String,
    pub bio: Option<String>,
    pub is_verified: bool,
}

impl NormalizedDoctor {
    pub fn from_doctor(doctor: &Doctor) -> Self {
        let name = doctor.full_name();

        Self {
            id: doctor.id,
            initials: initials(&name),
            name,
            last_name: doctor.last_name.clone(),
            email: doctor.email.clone(),
            specialization: text_or(&doctor.specialization, DEFAULT_SPECIALIZATION),
            experience: doctor
                .experience
                .filter(|years| *years > 0)
                .unwrap_or(DEFAULT_EXPERIENCE_YEARS),
            rating: text_or(&doctor.rating, DEFAULT_RATING),
            consultation_fee: text_or(&doctor.consultation_fee, DEFAULT_CONSULTATION_FEE),
            bio: doctor.bio.clone().filter(|bio| !bio.is_empty()),
            is_verified: doctor.is_verified,
        }
    }
}

pub fn text_or(value: &Option<String>, fallback: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// One card of the find-doctors grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorCardView {
    pub id: i64,
    pub name: String,
    pub initials: String,
    pub specialization: String,
    pub experience: u32,
    pub rating: String,
    pub fee: String,
    pub bio: String,
    pub is_verified: bool,
}

impl From<&Doctor> for DoctorCardView {
    fn from(doctor: &Doctor) -> Self {
        let normalized = NormalizedDoctor::from_doctor(doctor);
        Self {
            id: normalized.id,
            name: normalized.name,
            initials: normalized.initials,
            specialization: normalized.specialization,
            experience: normalized.experience,
            rating: normalized.rating,
            fee: normalized.consultation_fee,
            bio: normalized.bio.unwrap_or_else(|| DEFAULT_CARD_BIO.to_string()),
            is_verified: normalized.is_verified,
        }
    }
}

/// The "View Profile" modal.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorDetailsView {
    pub id: i64,
    pub name: String,
    pub initials: String,
    pub email: String,
    pub specialization: String,
    pub experience: u32,
    pub rating: String,
    pub fee: String,
    pub bio: String,
}

impl From<&Doctor> for DoctorDetailsView {
    fn from(doctor: &Doctor) -> Self {
        let normalized = NormalizedDoctor::from_doctor(doctor);
        Self {
            id: normalized.id,
            name: normalized.name,
            initials: normalized.initials,
            email: normalized.email,
            specialization: normalized.specialization,
            experience: normalized.experience,
            rating: normalized.rating,
            fee: normalized.consultation_fee,
            bio: normalized.bio.unwrap_or_else(|| DEFAULT_DETAILS_BIO.to_string()),
        }
    }
}

/// Outcome of loading the doctor directory.
#[derive(Debug, Clone, PartialEq)]
pub enum DoctorListView {
    Loaded(Vec<DoctorCardView>),
    Empty,
    /// The listing could not be fetched. Rendered with a Retry action.
    Unavailable,
}

impl DoctorListView {
    pub fn from_doctors(doctors: &[Doctor]) -> Self {
        if doctors.is_empty() {
            DoctorListView::Empty
        } else {
            DoctorListView::Loaded(doctors.iter().map(DoctorCardView::from).collect())
        }
    }

    pub fn cards(&self) -> &[DoctorCardView] {
        match self {
            DoctorListView::Loaded(cards) => cards,
            _ => &[],
        }
    }
}
