use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dcm_core::{
    resolve_data_dir, AuthService, ClinicStore, CoreConfig, IncidentDraft, IncidentId,
    IncidentStatus, IncidentUpdate, JsonFileStorage, PatientDraft, PatientId, PatientUpdate,
    StorageMedium,
};
use dcm_types::{Cost, EmailAddress, NonEmptyText};

#[derive(Parser)]
#[command(name = "dcm")]
#[command(about = "DCM clinic management console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    ListPatients,
    /// Show one patient and their incidents
    ShowPatient {
        /// Patient id
        id: PatientId,
    },
    /// Register a new patient
    AddPatient {
        /// Full name
        name: NonEmptyText,
        /// Date of birth (YYYY-MM-DD)
        dob: NaiveDate,
        /// Contact phone number
        contact: NonEmptyText,
        #[arg(long)]
        email: Option<EmailAddress>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        emergency_contact: Option<String>,
        #[arg(long)]
        blood_group: Option<String>,
        #[arg(long)]
        insurance: Option<String>,
        #[arg(long)]
        health_info: Option<String>,
        #[arg(long)]
        medical_history: Option<String>,
    },
    /// Update fields of an existing patient
    UpdatePatient {
        /// Patient id
        id: PatientId,
        #[arg(long)]
        name: Option<NonEmptyText>,
        #[arg(long)]
        dob: Option<NaiveDate>,
        #[arg(long)]
        contact: Option<NonEmptyText>,
        #[arg(long)]
        email: Option<EmailAddress>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        health_info: Option<String>,
        #[arg(long)]
        medical_history: Option<String>,
    },
    /// Delete a patient and every incident referencing them
    DeletePatient {
        /// Patient id
        id: PatientId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List incidents, optionally for one patient
    ListIncidents {
        /// Restrict to one patient id
        #[arg(long)]
        patient: Option<PatientId>,
    },
    /// Record a new incident (appointment/treatment)
    AddIncident {
        /// Owning patient id
        patient_id: PatientId,
        /// Short title, e.g. "Cleaning"
        title: NonEmptyText,
        /// Appointment date-time (YYYY-MM-DDTHH:MM:SS)
        appointment_date: NaiveDateTime,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        comments: Option<String>,
        #[arg(long)]
        cost: Option<f64>,
        #[arg(long)]
        status: Option<IncidentStatus>,
        #[arg(long)]
        next_appointment: Option<NaiveDateTime>,
    },
    /// Update fields of an existing incident
    UpdateIncident {
        /// Incident id
        id: IncidentId,
        #[arg(long)]
        title: Option<NonEmptyText>,
        #[arg(long)]
        status: Option<IncidentStatus>,
        #[arg(long)]
        cost: Option<f64>,
        #[arg(long)]
        treatment: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        next_appointment: Option<NaiveDateTime>,
    },
    /// Delete an incident
    DeleteIncident {
        /// Incident id
        id: IncidentId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Ingest a file and attach it to an incident
    Attach {
        /// Incident id
        incident_id: IncidentId,
        /// Path of the file to attach
        file: PathBuf,
    },
    /// Print the derived dashboard figures
    Analytics {
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Restore the sample data set and clear the login session
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Log in with email and password
    Login { email: String, password: String },
    /// Clear the login session
    Logout,
    /// Show the logged-in user
    Whoami,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("dcm=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let data_dir = resolve_data_dir(std::env::var_os("DCM_DATA_DIR").map(PathBuf::from));
    let cfg = CoreConfig::new(data_dir)?;
    tracing::debug!("using data directory {}", cfg.data_dir().display());

    let storage: Arc<dyn StorageMedium> = Arc::new(JsonFileStorage::open(cfg.data_dir())?);
    let mut store = ClinicStore::open(storage.clone())?;
    let auth = AuthService::new(storage);

    match cli.command {
        Commands::ListPatients => {
            if store.patients().is_empty() {
                println!("No patients found.");
            } else {
                for patient in store.patients() {
                    println!(
                        "ID: {}, Name: {}, DOB: {}, Contact: {}",
                        patient.id, patient.name, patient.dob, patient.contact
                    );
                }
            }
        }
        Commands::ShowPatient { id } => match store.patient(&id) {
            Some(patient) => {
                println!("ID:      {}", patient.id);
                println!("Name:    {}", patient.name);
                println!("DOB:     {}", patient.dob);
                println!("Contact: {}", patient.contact);
                if let Some(email) = &patient.email {
                    println!("Email:   {}", email);
                }
                if let Some(info) = &patient.health_info {
                    println!("Health:  {}", info);
                }
                let incidents = store.incidents_for_patient(&id);
                let (pending, completed) = store.patient_incident_counts(&id);
                println!(
                    "Incidents: {} total, {} pending, {} completed",
                    incidents.len(),
                    pending,
                    completed
                );
                for incident in incidents {
                    println!(
                        "  {} [{}] {} @ {}",
                        incident.id, incident.status, incident.title, incident.appointment_date
                    );
                }
            }
            None => println!("No patient with id '{}'.", id),
        },
        Commands::AddPatient {
            name,
            dob,
            contact,
            email,
            address,
            emergency_contact,
            blood_group,
            insurance,
            health_info,
            medical_history,
        } => {
            let mut draft = PatientDraft::new(name, dob, contact);
            draft.email = email;
            draft.address = address;
            draft.emergency_contact = emergency_contact;
            draft.blood_group = blood_group;
            draft.insurance = insurance;
            draft.health_info = health_info;
            draft.medical_history = medical_history;

            let id = store.add_patient(draft)?;
            println!("Added patient with id: {}", id);
        }
        Commands::UpdatePatient {
            id,
            name,
            dob,
            contact,
            email,
            address,
            health_info,
            medical_history,
        } => {
            store.update_patient(
                &id,
                PatientUpdate {
                    name,
                    dob,
                    contact,
                    email,
                    address,
                    health_info,
                    medical_history,
                    ..Default::default()
                },
            )?;
            println!("Updated patient {}", id);
        }
        Commands::DeletePatient { id, yes } => {
            let related = store.incidents_for_patient(&id).len();
            if !yes {
                anyhow::bail!(
                    "deleting patient '{}' also deletes {} incident(s); pass --yes to confirm",
                    id,
                    related
                );
            }
            store.delete_patient(&id)?;
            println!("Deleted patient {} and {} incident(s).", id, related);
        }
        Commands::ListIncidents { patient } => {
            let incidents: Vec<_> = match &patient {
                Some(id) => store.incidents_for_patient(id),
                None => store.incidents().iter().collect(),
            };
            if incidents.is_empty() {
                println!("No incidents found.");
            } else {
                for incident in incidents {
                    println!(
                        "ID: {}, Patient: {}, Title: {}, When: {}, Status: {}, Cost: {}",
                        incident.id,
                        incident.patient_id,
                        incident.title,
                        incident.appointment_date,
                        incident.status,
                        incident.cost
                    );
                }
            }
        }
        Commands::AddIncident {
            patient_id,
            title,
            appointment_date,
            description,
            comments,
            cost,
            status,
            next_appointment,
        } => {
            let mut draft = IncidentDraft::new(patient_id, title, appointment_date);
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(comments) = comments {
                draft.comments = comments;
            }
            if let Some(cost) = cost {
                draft.cost = Cost::new(cost);
            }
            if let Some(status) = status {
                draft.status = status;
            }
            draft.next_appointment_date = next_appointment;

            let id = store.add_incident(draft)?;
            println!("Added incident with id: {}", id);
        }
        Commands::UpdateIncident {
            id,
            title,
            status,
            cost,
            treatment,
            notes,
            next_appointment,
        } => {
            store.update_incident(
                &id,
                IncidentUpdate {
                    title,
                    status,
                    cost: cost.map(Cost::new),
                    treatment,
                    notes,
                    next_appointment_date: next_appointment,
                    ..Default::default()
                },
            )?;
            println!("Updated incident {}", id);
        }
        Commands::DeleteIncident { id, yes } => {
            if !yes {
                anyhow::bail!("deleting incident '{}' is permanent; pass --yes to confirm", id);
            }
            store.delete_incident(&id)?;
            println!("Deleted incident {}.", id);
        }
        Commands::Attach { incident_id, file } => {
            let Some(incident) = store.incident(&incident_id) else {
                anyhow::bail!("no incident with id '{}'", incident_id);
            };

            let attachment = dcm_files::ingest(&file).await?;
            let kind = if attachment.is_image() {
                "image"
            } else if attachment.is_document() {
                "document"
            } else {
                "file"
            };
            println!(
                "Ingested {} '{}' ({} bytes, {})",
                kind, attachment.name, attachment.size, attachment.media_type
            );

            let mut files = incident.files.clone();
            files.push(attachment);
            store.update_incident(
                &incident_id,
                IncidentUpdate {
                    files: Some(files),
                    ..Default::default()
                },
            )?;
            println!("Attached to incident {}.", incident_id);
        }
        Commands::Analytics { json } => {
            let analytics = store.analytics();
            if json {
                println!("{}", serde_json::to_string_pretty(&analytics)?);
            } else {
                println!("Total revenue:          {}", analytics.total_revenue);
                println!("Pending appointments:   {}", analytics.pending_appointments);
                println!("Completed treatments:   {}", analytics.completed_treatments);
                println!("Total patients:         {}", analytics.total_patients);
                println!(
                    "With upcoming visits:   {}",
                    analytics.patients_with_upcoming_appointments
                );
            }
        }
        Commands::Reset { yes } => {
            if !yes {
                anyhow::bail!("reset discards all data and restores the sample set; pass --yes to confirm");
            }
            store.reset()?;
            println!(
                "Reset complete: {} patient(s), {} incident(s).",
                store.patients().len(),
                store.incidents().len()
            );
        }
        Commands::Login { email, password } => match auth.login(&email, &password) {
            Ok(user) => println!("Logged in as {} ({:?}).", user.email, user.role),
            Err(e) => eprintln!("Login failed: {}", e),
        },
        Commands::Logout => {
            auth.logout()?;
            println!("Logged out.");
        }
        Commands::Whoami => match auth.current_user()? {
            Some(user) => {
                println!("Logged in as {} ({:?}).", user.email, user.role);
                if let Some(patient_id) = &user.patient_id {
                    println!("Linked patient record: {}", patient_id);
                }
            }
            None => println!("Not logged in."),
        },
    }

    Ok(())
}
