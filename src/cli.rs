use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::info;

use crate::clients::api_client::{ApiClient, ApiError};
use crate::config::Settings;
use crate::models::auth::{AuthError, AuthSession, TokenStore};
use crate::models::client::{ClientDirectory, ClientDraft, ClientId};
use crate::models::evaluation::{EvaluationDraft, EvaluationId};
use crate::models::session::{SessionDraft, SessionId, SessionStatus};
use crate::service::agenda::FilterMode;
use crate::service::confirmation::{AlwaysConfirm, DeleteConfirmation, InquireConfirmation};
use crate::service::dashboard_service::DashboardStats;
use crate::service::repository::ClinicRepository;
use crate::service::session_service::{SaveError, SessionService};
use crate::views::agenda_view::AgendaView;
use crate::views::client_view::{render_client_detail, render_client_list, render_evaluation};
use crate::views::dashboard_view::render_dashboard;

#[derive(Parser)]
#[command(name = "clinicAgenda", about = "Clinic scheduling and client records")]
pub struct Cli {
    /// Skip delete confirmations.
    #[arg(long, global = true)]
    yes: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Login {
        #[arg(long)]
        token: String,
    },
    Logout,
    Agenda {
        #[arg(long, default_value = "week")]
        filter: FilterMode,
    },
    Dashboard,
    Clients {
        #[command(subcommand)]
        command: ClientCommands,
    },
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
    Evaluations {
        #[command(subcommand)]
        command: EvaluationCommands,
    },
}

#[derive(Subcommand)]
enum ClientCommands {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        id: ClientId,
    },
    Create {
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        profession: String,
        #[arg(long, default_value = "")]
        city: String,
    },
    Update {
        id: ClientId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        birth_date: Option<NaiveDate>,
    },
    Delete {
        id: ClientId,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    Create {
        client: ClientId,
        /// Day of the session; defaults to 09:00-10:00 on that day.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_local_datetime)]
        start: Option<NaiveDateTime>,
        #[arg(long, value_parser = parse_local_datetime)]
        end: Option<NaiveDateTime>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Update {
        id: SessionId,
        #[arg(long, value_parser = parse_local_datetime)]
        start: Option<NaiveDateTime>,
        #[arg(long, value_parser = parse_local_datetime)]
        end: Option<NaiveDateTime>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Status {
        id: SessionId,
        status: StatusArg,
    },
    Delete {
        id: SessionId,
    },
}

#[derive(Subcommand)]
enum EvaluationCommands {
    List {
        client: ClientId,
    },
    Create {
        client: ClientId,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        complaint: Option<String>,
        #[arg(long)]
        diagnosis: Option<String>,
        #[arg(long)]
        plan: Option<String>,
    },
    Update {
        id: EvaluationId,
        #[arg(long)]
        client: ClientId,
        #[arg(long)]
        complaint: Option<String>,
        #[arg(long)]
        diagnosis: Option<String>,
        #[arg(long)]
        plan: Option<String>,
    },
    Delete {
        id: EvaluationId,
    },
    Evolve {
        id: EvaluationId,
        text: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Scheduled,
    Completed,
    Canceled,
}

impl From<StatusArg> for SessionStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Scheduled => SessionStatus::Scheduled,
            StatusArg::Completed => SessionStatus::Completed,
            StatusArg::Canceled => SessionStatus::Canceled,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error("{0}")]
    NotFound(String),
}

// Session times are clinic wall-clock; inputs with an offset are rejected.
fn parse_local_datetime(value: &str) -> Result<NaiveDateTime, String> {
    let normalized = value.trim().replacen(' ', "T", 1);
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .ok_or_else(|| format!("expected clinic local time YYYY-MM-DDTHH:MM[:SS], got {value}"))
}

pub async fn cli(settings: Settings) -> Result<(), CliError> {
    // Fine to exit here on bad arguments
    let cli = Cli::parse();
    let store = TokenStore::new(settings.token_location.clone());

    match cli.command {
        Commands::Login { token } => {
            let session = AuthSession::issue(&token)?;
            store.save(&session)?;
            println!("Sessão iniciada (token em {}).", store.path().display());
            Ok(())
        }
        Commands::Logout => {
            store.clear()?;
            println!("Sessão encerrada.");
            Ok(())
        }
        command => {
            let auth = store.load()?.ok_or(AuthError::NotLoggedIn)?;
            let api = ApiClient::new(
                &settings.api_url,
                settings.request_timeout,
                Some(auth),
                settings.timezone,
            )?;
            info!(api = api.base_url(), "using clinic api");
            let confirmation: Box<dyn DeleteConfirmation> = if cli.yes {
                Box::new(AlwaysConfirm)
            } else {
                Box::new(InquireConfirmation)
            };
            run_command(command, &api, confirmation.as_ref(), &settings).await
        }
    }
}

async fn run_command<R: ClinicRepository + ?Sized>(
    command: Commands,
    repo: &R,
    confirmation: &dyn DeleteConfirmation,
    settings: &Settings,
) -> Result<(), CliError> {
    let now = Utc::now().with_timezone(&settings.timezone).naive_local();
    let language = settings.language;

    match command {
        Commands::Agenda { filter } => {
            let mut view = AgendaView::new(filter);
            view.refresh(repo).await?;
            print!("{}", view.render(now, language));
        }
        Commands::Dashboard => {
            let (sessions, clients) = tokio::try_join!(repo.list_sessions(), repo.list_clients(None))?;
            let stats = DashboardStats::compute(&sessions, &clients, now);
            print!("{}", render_dashboard(&stats, &ClientDirectory::new(&clients), now, language));
        }
        Commands::Clients { command } => run_client_command(command, repo, confirmation, now.date()).await?,
        Commands::Sessions { command } => run_session_command(command, repo, confirmation, now.date()).await?,
        Commands::Evaluations { command } => run_evaluation_command(command, repo, confirmation).await?,
        Commands::Login { .. } | Commands::Logout => {}
    }
    Ok(())
}

async fn run_client_command<R: ClinicRepository + ?Sized>(
    command: ClientCommands,
    repo: &R,
    confirmation: &dyn DeleteConfirmation,
    today: NaiveDate,
) -> Result<(), CliError> {
    match command {
        ClientCommands::List { search } => {
            let clients = repo.list_clients(search.as_deref()).await?;
            print!("{}", render_client_list(&clients, search.as_deref(), today));
        }
        ClientCommands::Show { id } => {
            let (client, sessions, evaluations) = tokio::try_join!(
                repo.get_client(id),
                repo.list_sessions_for_client(id),
                repo.list_evaluations(id)
            )?;
            print!("{}", render_client_detail(&client, &sessions, &evaluations, today));
        }
        ClientCommands::Create { name, email, phone, birth_date, profession, city } => {
            let draft = ClientDraft {
                name,
                email,
                phone,
                birth_date,
                profession,
                city,
                ..ClientDraft::default()
            };
            let client = repo.create_client(&draft).await?;
            println!("Cliente #{} cadastrado.", client.id);
        }
        ClientCommands::Update { id, name, email, phone, birth_date } => {
            let current = repo.get_client(id).await?;
            let mut draft = ClientDraft::from(&current);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(email) = email {
                draft.email = email;
            }
            if let Some(phone) = phone {
                draft.phone = phone;
            }
            if birth_date.is_some() {
                draft.birth_date = birth_date;
            }
            repo.update_client(id, &draft).await?;
            println!("Cliente #{id} atualizado.");
        }
        ClientCommands::Delete { id } => {
            if confirmation.confirm(&format!("o cliente #{id}")).await {
                repo.delete_client(id).await?;
                info!(client = id, "client deleted");
                println!("Cliente #{id} removido.");
            } else {
                println!("Operação cancelada.");
            }
        }
    }
    Ok(())
}

async fn run_session_command<R: ClinicRepository + ?Sized>(
    command: SessionCommands,
    repo: &R,
    confirmation: &dyn DeleteConfirmation,
    today: NaiveDate,
) -> Result<(), CliError> {
    match command {
        SessionCommands::Create { client, date, start, end, name, notes } => {
            let mut draft = SessionDraft::new(client, date.unwrap_or(today));
            if let Some(start) = start {
                draft.start = start;
            }
            if let Some(end) = end {
                draft.end = end;
            }
            if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
                draft.name = name;
            }
            if let Some(notes) = notes {
                draft.notes = notes;
            }
            let session = SessionService::save(repo, None, &draft).await?;
            println!("Sessão #{} agendada.", session.id);
        }
        SessionCommands::Update { id, start, end, name, notes } => {
            let current = find_session(repo, id).await?;
            let mut draft = current.to_draft();
            if let Some(start) = start {
                draft.start = start;
            }
            if let Some(end) = end {
                draft.end = end;
            }
            if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
                draft.name = name;
            }
            if let Some(notes) = notes {
                draft.notes = notes;
            }
            SessionService::save(repo, Some(id), &draft).await?;
            println!("Sessão #{id} atualizada.");
        }
        SessionCommands::Status { id, status } => {
            let current = find_session(repo, id).await?;
            let saved = SessionService::set_status(repo, &current, status.into()).await?;
            println!("Sessão #{} agora está {}.", saved.id, saved.status.wire_name());
        }
        SessionCommands::Delete { id } => {
            let mut view = AgendaView::new(FilterMode::All);
            view.request_delete(id);
            if confirmation.confirm(&format!("o agendamento #{id}")).await {
                view.confirm_delete(repo).await?;
                println!("Agendamento removido com sucesso!");
            } else {
                view.cancel_delete();
                println!("Operação cancelada.");
            }
        }
    }
    Ok(())
}

async fn find_session<R: ClinicRepository + ?Sized>(
    repo: &R,
    id: SessionId,
) -> Result<crate::models::session::Session, CliError> {
    repo.list_sessions()
        .await?
        .into_iter()
        .find(|session| session.id == id)
        .ok_or_else(|| CliError::NotFound(format!("sessão #{id} não encontrada")))
}

async fn run_evaluation_command<R: ClinicRepository + ?Sized>(
    command: EvaluationCommands,
    repo: &R,
    confirmation: &dyn DeleteConfirmation,
) -> Result<(), CliError> {
    match command {
        EvaluationCommands::List { client } => {
            let evaluations = repo.list_evaluations(client).await?;
            let mut out = String::new();
            for evaluation in &evaluations {
                render_evaluation(&mut out, evaluation);
            }
            if evaluations.is_empty() {
                out.push_str("Nenhuma avaliação registrada\n");
            }
            print!("{out}");
        }
        EvaluationCommands::Create { client, date, complaint, diagnosis, plan } => {
            let draft = EvaluationDraft {
                client_id: client,
                date,
                complaint,
                diagnosis,
                treatment_plan: plan,
                ..EvaluationDraft::default()
            };
            let evaluation = repo.create_evaluation(&draft).await?;
            println!("Avaliação #{} registrada.", evaluation.id);
        }
        EvaluationCommands::Update { id, client, complaint, diagnosis, plan } => {
            let current = repo
                .list_evaluations(client)
                .await?
                .into_iter()
                .find(|evaluation| evaluation.id == id)
                .ok_or_else(|| CliError::NotFound(format!("avaliação #{id} não encontrada")))?;
            let mut draft = current.to_draft(client);
            if complaint.is_some() {
                draft.complaint = complaint;
            }
            if diagnosis.is_some() {
                draft.diagnosis = diagnosis;
            }
            if plan.is_some() {
                draft.treatment_plan = plan;
            }
            repo.update_evaluation(id, &draft).await?;
            println!("Avaliação #{id} atualizada.");
        }
        EvaluationCommands::Delete { id } => {
            if confirmation.confirm(&format!("a avaliação #{id}")).await {
                repo.delete_evaluation(id).await?;
                info!(evaluation = id, "evaluation deleted");
                println!("Avaliação #{id} removida.");
            } else {
                println!("Operação cancelada.");
            }
        }
        EvaluationCommands::Evolve { id, text } => {
            let evaluation = repo.add_evolution(id, &text).await?;
            println!(
                "Evolução adicionada à avaliação #{} ({} no total).",
                evaluation.id,
                evaluation.evolutions.len()
            );
        }
    }
    Ok(())
}
