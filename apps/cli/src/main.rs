use anyhow::{bail, Context};
use campus_api::{ApiError, PersonalDetails, StudentRegistration, TeacherRegistration};
use campus_auth::Credential;
use campus_config::load as load_config;
use campus_runtime::{telemetry, ClientServices};
use clap::{Args, Parser, Subcommand};
use tracing::info;

mod chat;

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Campus school platform client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the credential locally
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored credential
    Logout,
    /// Show the stored user
    Whoami,
    /// Fetch the signed-in user's profile
    Profile,
    /// List your classes (students) or subjects (teachers)
    Classes,
    /// List schools, or one school's classes and subjects
    Schools {
        #[arg(long)]
        school_id: Option<i64>,
    },
    /// Create a student account
    RegisterStudent {
        #[command(flatten)]
        details: DetailsArgs,
        #[arg(long)]
        class_id: i64,
    },
    /// Create a teacher account
    RegisterTeacher {
        #[command(flatten)]
        details: DetailsArgs,
        /// Repeat for every subject taught
        #[arg(long = "subject-id")]
        subject_ids: Vec<i64>,
    },
    /// Join a class chat room; type lines to send, Ctrl+D or Ctrl+C to leave
    Chat {
        #[arg(long)]
        class_id: i64,
    },
}

#[derive(Args)]
struct DetailsArgs {
    #[arg(long)]
    school_slug: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    phone: String,
}

impl From<DetailsArgs> for PersonalDetails {
    fn from(args: DetailsArgs) -> Self {
        Self {
            school_slug: args.school_slug,
            email: args.email,
            password: args.password,
            first_name: args.first_name,
            last_name: args.last_name,
            phone: args.phone,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;
    let services = ClientServices::initialise(&config)
        .await
        .context("failed to initialise client services")?;

    match cli.command {
        Commands::Login { email, password } => login(&services, &email, &password).await,
        Commands::Logout => logout(&services).await,
        Commands::Whoami => whoami(&services).await,
        Commands::Profile => profile(&services).await,
        Commands::Classes => classes(&services).await,
        Commands::Schools { school_id } => schools(&services, school_id).await,
        Commands::RegisterStudent { details, class_id } => {
            let registration = StudentRegistration {
                details: details.into(),
                class_id,
            };
            let outcome = services
                .api
                .register_student(&registration)
                .await
                .map_err(explain)?;
            print_registration(outcome.message);
            Ok(())
        }
        Commands::RegisterTeacher {
            details,
            subject_ids,
        } => {
            let registration = TeacherRegistration {
                details: details.into(),
                subject_ids,
            };
            let outcome = services
                .api
                .register_teacher(&registration)
                .await
                .map_err(explain)?;
            print_registration(outcome.message);
            Ok(())
        }
        Commands::Chat { class_id } => {
            let credential = require_credential(&services).await?;
            chat::run(&services, credential, class_id).await
        }
    }
}

/// Turn an api failure into a message fit for the terminal
fn explain(error: ApiError) -> anyhow::Error {
    if error.is_unauthorized() {
        return anyhow::anyhow!("session expired, run `campus login` again");
    }
    anyhow::anyhow!(error.user_message())
}

async fn require_credential(services: &ClientServices) -> anyhow::Result<Credential> {
    match services.sessions.credential().await {
        Some(credential) => Ok(credential),
        None => bail!("not logged in, run `campus login` first"),
    }
}

async fn login(services: &ClientServices, email: &str, password: &str) -> anyhow::Result<()> {
    let login = services
        .api
        .login(email, password)
        .await
        .map_err(explain)?;
    services
        .sessions
        .save(&login.access_token, &login.user)
        .await
        .context("failed to store credential")?;

    info!(user_id = login.user.id, "logged in");
    println!("Welcome, {} ({})", login.user.full_name, login.user.role);
    Ok(())
}

async fn logout(services: &ClientServices) -> anyhow::Result<()> {
    services
        .sessions
        .clear()
        .await
        .context("failed to clear credential")?;
    println!("Logged out");
    Ok(())
}

async fn whoami(services: &ClientServices) -> anyhow::Result<()> {
    match services.sessions.user().await {
        Some(user) => {
            println!("{} (id {})", user.full_name, user.id);
            println!("role:   {}", user.role);
            println!("status: {}", user.status);
            if let Some(email) = user.email {
                println!("email:  {email}");
            }
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

async fn profile(services: &ClientServices) -> anyhow::Result<()> {
    let credential = require_credential(services).await?;
    let profile = services
        .api
        .profile(&credential.token)
        .await
        .map_err(explain)?;

    println!("Hello, {}", profile.display_name());
    println!("name:   {}", profile.full_name);
    if let Some(email) = &profile.email {
        println!("email:  {email}");
    }
    if let Some(phone) = &profile.phone {
        println!("phone:  {phone}");
    }
    println!("role:   {}", profile.role);
    println!("status: {}", profile.status);
    if let Some(school_id) = profile.school_id {
        println!("school: {school_id}");
    }
    Ok(())
}

async fn classes(services: &ClientServices) -> anyhow::Result<()> {
    let credential = require_credential(services).await?;
    let profile = services
        .api
        .profile(&credential.token)
        .await
        .map_err(explain)?;

    if profile.is_student() {
        let classes = services
            .api
            .my_classes(&credential.token)
            .await
            .map_err(explain)?;
        if classes.is_empty() {
            println!("No classes");
        }
        for class in classes {
            println!("  {}: {}", class.id, class.name);
        }
    } else {
        let subjects = services
            .api
            .my_subjects(&credential.token)
            .await
            .map_err(explain)?;
        if subjects.is_empty() {
            println!("No subjects");
        }
        for subject in subjects {
            println!(
                "  {}: {} ({})",
                subject.id,
                subject.name,
                subject.code.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}

async fn schools(services: &ClientServices, school_id: Option<i64>) -> anyhow::Result<()> {
    let Some(school_id) = school_id else {
        let schools = services.api.list_schools().await.map_err(explain)?;
        if schools.is_empty() {
            println!("No schools found");
        }
        for school in schools {
            println!("  {}: {} [{}]", school.id, school.name, school.slug);
        }
        return Ok(());
    };

    let classes = services
        .api
        .classes_by_school(school_id)
        .await
        .map_err(explain)?;
    println!("Classes:");
    for class in classes {
        println!(
            "  {}: {} {}",
            class.id,
            class.name,
            class.academic_year.as_deref().unwrap_or("")
        );
    }

    let subjects = services
        .api
        .subjects_by_school(school_id)
        .await
        .map_err(explain)?;
    println!("Subjects:");
    for subject in subjects {
        println!("  {}: {}", subject.id, subject.name);
    }
    Ok(())
}

fn print_registration(message: Option<String>) {
    let message = message
        .unwrap_or_else(|| "Registration received, waiting for administrator approval".into());
    println!("{message}");
}
