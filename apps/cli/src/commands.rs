use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use appointment_cell::views::{render_appointments, render_booking_modal};
use appointment_cell::{AppointmentBook, AppointmentScope, BookingForm, BookingService};
use auth_cell::{AuthState, PreferenceService, SessionManager, Theme, UserAdministration};
use doctor_cell::views::{render_details, render_doctor_list};
use doctor_cell::{DoctorListView, FindDoctorsPage};
use shared_config::ClientConfig;
use shared_models::{MedicalProfile, RegistrationRequest, Role};

#[derive(Parser, Debug)]
#[command(name = "medicare")]
#[command(author, version, about = "MediCare doctor appointment client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        email: String,
        #[arg(long, env = "MEDICARE_PASSWORD")]
        password: String,
    },

    /// Create a patient account
    Register {
        email: String,
        #[arg(long, env = "MEDICARE_PASSWORD")]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// List doctors
    Doctors {
        /// Print the rendered page fragment instead of a table
        #[arg(long)]
        html: bool,
    },

    /// Show one doctor's profile
    Doctor {
        id: i64,
        #[arg(long)]
        html: bool,
        /// Show the booking form instead of the profile
        #[arg(long)]
        booking: bool,
    },

    /// Book an appointment with a doctor
    Book {
        doctor: i64,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// One of 09:00, 10:00, 11:00, 14:00, 15:00, 16:00
        #[arg(long)]
        time: String,
        #[arg(long)]
        reason: String,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List your appointments
    Appointments {
        /// Use the my-appointments listing
        #[arg(long)]
        mine: bool,
        #[arg(long)]
        html: bool,
    },

    /// Cancel an appointment
    Cancel { id: i64 },

    /// Show or update your medical profile (patients)
    MedicalProfile {
        #[arg(long)]
        blood_group: Option<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        medical_history: Option<String>,
    },

    /// List all users (admin)
    Users,

    /// Mark a user as verified (admin)
    VerifyUser { id: i64 },

    /// Delete a user (admin)
    DeleteUser { id: i64 },

    /// Show or set the colour theme
    Theme { theme: Option<Theme> },
}

/// Everything a command needs, built once per process.
pub struct App {
    pub config: ClientConfig,
    pub session: Arc<SessionManager>,
}

pub async fn run(command: Commands, app: &App) -> Result<()> {
    let session = &app.session;

    // every page load starts from what storage says
    session.check_auth().await;

    match command {
        Commands::Login { email, password } => {
            session.login(&email, &password).await;
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
            phone,
            address,
        } => {
            let request = RegistrationRequest {
                email,
                password,
                first_name,
                last_name,
                phone,
                address,
                ..Default::default()
            };
            // the notifier has already shown the failure
            let _ = session.register(request).await;
        }
        Commands::Logout => session.logout().await,
        Commands::Whoami => match session.state().await {
            AuthState::Authenticated(user) => {
                println!("{} <{}> ({})", user.display_name(), user.email, user.role)
            }
            AuthState::Anonymous => println!("{}", session.display_name().await),
        },
        Commands::Doctors { html } => {
            let Some(view) = FindDoctorsPage::new(session.clone()).load().await else {
                return Ok(());
            };
            if html {
                println!("{}", render_doctor_list(&view)?);
            } else {
                print_doctor_table(&view);
            }
        }
        Commands::Doctor { id, html, booking } => {
            if booking {
                if !session.require_auth(&[Role::Patient]).await {
                    return Ok(());
                }
                let service = BookingService::new(&app.config, session.clone());
                if let Some(modal) = service.open_booking(id).await {
                    println!("{}", render_booking_modal(&modal)?);
                }
            } else if let Some(details) = FindDoctorsPage::new(session.clone()).view_details(id).await {
                if html {
                    println!("{}", render_details(&details)?);
                } else {
                    println!("Dr. {} ({})", details.name, details.specialization);
                    println!("  Email:      {}", details.email);
                    println!("  Experience: {} years", details.experience);
                    println!("  Rating:     {}/5.0", details.rating);
                    println!("  Fee:        ${}", details.fee);
                    println!("  About:      {}", details.bio);
                }
            }
        }
        Commands::Book {
            doctor,
            date,
            time,
            reason,
            notes,
        } => {
            let service = BookingService::new(&app.config, session.clone());
            let form = BookingForm {
                doctor_id: doctor,
                date,
                time,
                reason,
                notes,
            };
            if let Ok(appointment) = service.submit(&form).await {
                println!("Appointment #{} is {}", appointment.id, appointment.status.as_str());
            }
        }
        Commands::Appointments { mine, html } => {
            let scope = if mine {
                AppointmentScope::Mine
            } else {
                AppointmentScope::All
            };
            if let Some(rows) = AppointmentBook::new(session.clone()).load(scope).await {
                if html {
                    println!("{}", render_appointments(&rows)?);
                } else if rows.is_empty() {
                    println!("No appointments");
                } else {
                    for row in rows {
                        println!(
                            "#{:<5} {:<14} {:<9} {:<10} {:<24} {}",
                            row.id, row.date, row.time, row.status, row.with_whom, row.notes
                        );
                    }
                }
            }
        }
        Commands::Cancel { id } => {
            AppointmentBook::new(session.clone()).cancel(id).await;
        }
        Commands::MedicalProfile {
            blood_group,
            allergies,
            medical_history,
        } => {
            if !session.require_auth(&[Role::Patient]).await {
                return Ok(());
            }
            let profile = if blood_group.is_none() && allergies.is_none() && medical_history.is_none() {
                session.api().get_medical_profile().await
            } else {
                let update = MedicalProfile {
                    blood_group,
                    allergies,
                    medical_history,
                    ..Default::default()
                };
                session.api().update_medical_profile(&update).await
            }
            .context("Medical profile request failed")?;
            print_medical_profile(&profile);
        }
        Commands::Users => {
            if let Some(users) = UserAdministration::new(session.clone()).list_users().await {
                for user in users {
                    let verified = if user.is_verified.unwrap_or(false) { "verified" } else { "" };
                    println!("#{:<5} {:<8} {:<28} {} {}", user.id, user.role, user.email, user.full_name(), verified);
                }
            }
        }
        Commands::VerifyUser { id } => {
            UserAdministration::new(session.clone()).verify_user(id).await;
        }
        Commands::DeleteUser { id } => {
            UserAdministration::new(session.clone()).delete_user(id).await;
        }
        Commands::Theme { theme } => {
            let preferences = PreferenceService::new(session.api().store().clone());
            match theme {
                Some(theme) => preferences
                    .set_theme(theme)
                    .await
                    .map_err(|e| anyhow!("Could not save theme: {}", e))?,
                None => println!("{}", preferences.theme().await),
            }
        }
    }

    Ok(())
}

fn print_doctor_table(view: &DoctorListView) {
    match view {
        DoctorListView::Loaded(cards) => {
            for card in cards {
                let verified = if card.is_verified { "✓" } else { " " };
                println!(
                    "#{:<5} {} {:<24} {:<20} {:>3} yrs  ★ {:<4} ${}",
                    card.id, verified, card.name, card.specialization, card.experience, card.rating, card.fee
                );
            }
        }
        DoctorListView::Empty => println!("No Doctors Available"),
        DoctorListView::Unavailable => println!("Unable to Load Doctors. Run the command again to retry."),
    }
}

fn print_medical_profile(profile: &MedicalProfile) {
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());
    println!(
        "Date of birth:   {}",
        profile
            .date_of_birth
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("Blood group:     {}", show(&profile.blood_group));
    println!("Allergies:       {}", show(&profile.allergies));
    println!("Medical history: {}", show(&profile.medical_history));
}
