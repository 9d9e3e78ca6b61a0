//! Askama templates for the doctor pages.

use askama::Template;

use crate::models::{DoctorCardView, DoctorDetailsView, DoctorListView};

#[derive(Template)]
#[template(path = "doctors/card.html")]
pub struct DoctorCardTemplate<'a> {
    pub card: &'a DoctorCardView,
}

#[derive(Template)]
#[template(path = "doctors/grid.html")]
pub struct DoctorGridTemplate<'a> {
    pub cards: &'a [DoctorCardView],
}

/// Empty and error states of the grid.
#[derive(Template)]
#[template(path = "doctors/notice.html")]
pub struct DoctorNoticeTemplate<'a> {
    pub icon: &'a str,
    pub heading: &'a str,
    pub message: &'a str,
    pub retry: bool,
}

#[derive(Template)]
#[template(path = "doctors/details.html")]
pub struct DoctorDetailsTemplate<'a> {
    pub doctor: &'a DoctorDetailsView,
}

pub fn render_card(card: &DoctorCardView) -> askama::Result<String> {
    DoctorCardTemplate { card }.render()
}

pub fn render_doctor_list(view: &DoctorListView) -> askama::Result<String> {
    match view {
        DoctorListView::Loaded(cards) => DoctorGridTemplate { cards }.render(),
        DoctorListView::Empty => DoctorNoticeTemplate {
            icon: "fa-user-md",
            heading: "No Doctors Available",
            message: "There are currently no doctors registered in the system.",
            retry: false,
        }
        .render(),
        DoctorListView::Unavailable => DoctorNoticeTemplate {
            icon: "fa-exclamation-triangle",
            heading: "Unable to Load Doctors",
            message: "Please check your internet connection and try again.",
            retry: true,
        }
        .render(),
    }
}

pub fn render_details(doctor: &DoctorDetailsView) -> askama::Result<String> {
    DoctorDetailsTemplate { doctor }.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> DoctorCardView {
        DoctorCardView {
            id: 7,
            name: "Ada Obi".to_string(),
            initials: "AO".to_string(),
            specialization: "Cardiology".to_string(),
            experience: 12,
            rating: "4.8".to_string(),
            fee: "150.00".to_string(),
            bio: "Board certified.".to_string(),
            is_verified: true,
        }
    }

    #[test]
    fn test_card_renders_fields() {
        let html = render_card(&card()).unwrap();

        assert!(html.contains(r#"data-doctor-id="7""#));
        assert!(html.contains("Ada Obi"));
        assert!(html.contains("Verified"));
        assert!(html.contains("12 yrs"));
        assert!(html.contains("$150.00"));
    }

    #[test]
    fn test_unverified_card_has_no_badge() {
        let html = render_card(&DoctorCardView {
            is_verified: false,
            ..card()
        })
        .unwrap();
        assert!(!html.contains("verified-badge"));
    }

    #[test]
    fn test_server_text_is_escaped() {
        let html = render_card(&DoctorCardView {
            bio: "<script>alert(1)</script>".to_string(),
            ..card()
        })
        .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_list_states() {
        let grid = render_doctor_list(&DoctorListView::Loaded(vec![card(), card()])).unwrap();
        assert_eq!(grid.matches("doctor-card").count(), 2);

        let empty = render_doctor_list(&DoctorListView::Empty).unwrap();
        assert!(empty.contains("No Doctors Available"));
        assert!(!empty.contains("Retry"));

        let unavailable = render_doctor_list(&DoctorListView::Unavailable).unwrap();
        assert!(unavailable.contains("Unable to Load Doctors"));
        assert!(unavailable.contains("Retry"));
    }

    #[test]
    fn test_details_modal() {
        let details = DoctorDetailsView {
            id: 7,
            name: "Ada Obi".to_string(),
            initials: "AO".to_string(),
            email: "ada@example.com".to_string(),
            specialization: "General Physician".to_string(),
            experience: 5,
            rating: "4.5".to_string(),
            fee: "100".to_string(),
            bio: "No bio available.".to_string(),
        };
        let html = render_details(&details).unwrap();

        assert!(html.contains("Dr. Ada Obi"));
        assert!(html.contains("4.5/5.0"));
        assert!(html.contains("5 years"));
        assert!(html.contains("No bio available."));
    }
}
