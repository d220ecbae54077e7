use std::io::{self, Write};

use clap::{Parser, Subcommand};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use petdir_client::{ClientError, HttpPetService, Session, DEFAULT_API_URL};
use petdir_core::{Pet, KNOWN_SPECIES};

mod shell;

use shell::ShellCommand;

type PetSession = Session<HttpPetService>;

#[derive(Parser)]
#[command(name = "petdir", version, about = "Manage the pet directory")]
struct Cli {
    /// Base URL of the pet directory service
    #[arg(long, env = "PETDIR_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pets, optionally filtered by species
    List {
        /// Exact species to show (Dog, Cat, Fish, Bird, Other)
        #[arg(long)]
        species: Option<String>,
    },
    /// Show a single pet
    Show {
        /// Pet id
        id: i64,
    },
    /// Register a new pet
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "Dog")]
        species: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        owner: String,
    },
    /// Edit a pet; fields not given keep their current value
    Edit {
        /// Pet id
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        species: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Delete a pet
    Delete {
        /// Pet id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show the average age
    Stats,
    /// Interactive session
    Shell,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> petdir_client::Result<()> {
    log::debug!("Using pet service at {}", cli.api_url);
    let mut session = Session::new(HttpPetService::new(&cli.api_url)?);
    session.refresh().await;

    match cli.command {
        Commands::List { species } => cmd_list(&mut session, species).await,
        Commands::Show { id } => cmd_show(&session, id).await,
        Commands::Add { name, species, age, owner } => {
            session.open_new();
            let form = session.form_mut();
            form.name = name;
            form.species = species;
            form.age = age;
            form.owner = owner;
            save_and_report(&mut session).await
        }
        Commands::Edit { id, name, species, age, owner } => {
            let Some(pet) = session.find(id).await? else {
                println!("Pet {} not found.", id);
                return Ok(());
            };
            session.open_edit(pet);
            let form = session.form_mut();
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(species) = species {
                form.species = species;
            }
            if let Some(age) = age {
                form.age = age;
            }
            if let Some(owner) = owner {
                form.owner = owner;
            }
            save_and_report(&mut session).await
        }
        Commands::Delete { id, yes } => cmd_delete(&mut session, id, yes).await,
        Commands::Stats => {
            print_banner(&session);
            Ok(())
        }
        Commands::Shell => cmd_shell(&mut session).await,
    }
}

fn print_banner(session: &PetSession) {
    let demo = if session.is_demo_mode() { " (DEMO MODE)" } else { "" };
    println!(
        "Pet directory{} | average age: {:.1} years",
        demo,
        session.average_age()
    );
}

fn print_pets(session: &PetSession) {
    print_banner(session);
    if let Some(species) = session.species_filter() {
        println!("Filter: {}", species);
    }

    let pets = session.pets();
    if pets.is_empty() {
        println!("No pets found.");
        return;
    }

    println!("{}", pet_table(pets));
}

fn pet_table(pets: &[Pet]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Name", "Species", "Age", "Owner"]);

    for p in pets {
        table.add_row(vec![
            format!("#{}", p.id),
            p.name.clone(),
            p.species.clone(),
            p.age.to_string(),
            p.owner.clone(),
        ]);
    }
    table
}

async fn cmd_list(session: &mut PetSession, species: Option<String>) -> petdir_client::Result<()> {
    if species.is_some() {
        session.set_filter(species).await;
    }
    print_pets(session);
    Ok(())
}

async fn cmd_show(session: &PetSession, id: i64) -> petdir_client::Result<()> {
    match session.find(id).await? {
        Some(pet) => println!("{}", pet_table(std::slice::from_ref(&pet))),
        None => println!("Pet {} not found.", id),
    }
    Ok(())
}

async fn save_and_report(session: &mut PetSession) -> petdir_client::Result<()> {
    let editing = matches!(
        session.view(),
        petdir_client::View::EditForm { target: Some(_) }
    );
    session.save().await?;
    if session.is_demo_mode() {
        println!("Saved locally (service offline, demo mode).");
    } else if editing {
        println!("Pet updated.");
    } else {
        println!("Pet registered.");
    }
    print_pets(session);
    Ok(())
}

fn confirm(question: &str) -> io::Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

async fn cmd_delete(session: &mut PetSession, id: i64, yes: bool) -> petdir_client::Result<()> {
    session.request_delete(id);
    if !yes && !confirm(&format!("Delete pet {}?", id))? {
        session.cancel_delete();
        println!("Aborted.");
        return Ok(());
    }
    session.confirm_delete().await?;
    println!("Pet {} deleted.", id);
    print_pets(session);
    Ok(())
}

/// Ask for a field, keeping `current` when the answer is blank.
fn prompt(label: &str, current: &str) -> io::Result<String> {
    if current.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, current);
    }
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim();
    Ok(if answer.is_empty() {
        current.to_string()
    } else {
        answer.to_string()
    })
}

/// Fill the open form interactively and save; on a validation error the
/// form stays open and is asked again.
async fn fill_and_save(session: &mut PetSession) -> petdir_client::Result<()> {
    loop {
        let current = session.form().clone();
        let name = prompt("Name", &current.name)?;
        let species = prompt(&format!("Species ({})", KNOWN_SPECIES.join("/")), &current.species)?;
        let age = prompt("Age", &current.age)?;
        let owner = prompt("Owner", &current.owner)?;

        let form = session.form_mut();
        form.name = name;
        form.species = species;
        form.age = age;
        form.owner = owner;

        match save_and_report(session).await {
            Err(ClientError::Validation(e)) => {
                println!("{}", e);
                if !confirm("Try again?")? {
                    session.cancel().await;
                    return Ok(());
                }
            }
            Err(e) => {
                session.cancel().await;
                return Err(e);
            }
            Ok(()) => return Ok(()),
        }
    }
}

async fn cmd_shell(session: &mut PetSession) -> petdir_client::Result<()> {
    print_pets(session);
    println!("Type 'help' for commands.");

    loop {
        print!("petdir> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let command = match ShellCommand::parse(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        let result = match command {
            ShellCommand::List => {
                session.refresh().await;
                print_pets(session);
                Ok(())
            }
            ShellCommand::Filter(species) => {
                session.set_filter(species).await;
                print_pets(session);
                Ok(())
            }
            ShellCommand::New => {
                session.open_new();
                fill_and_save(session).await
            }
            ShellCommand::Edit(id) => match session.find(id).await {
                Ok(Some(pet)) => {
                    session.open_edit(pet);
                    fill_and_save(session).await
                }
                Ok(None) => {
                    println!("Pet {} not found.", id);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            ShellCommand::Delete(id) => cmd_delete(session, id, false).await,
            ShellCommand::Stats => {
                print_banner(session);
                Ok(())
            }
            ShellCommand::Help => {
                println!("{}", ShellCommand::HELP);
                Ok(())
            }
            ShellCommand::Quit => break,
        };

        // Errors in the shell are reported and the session carries on.
        if let Err(e) = result {
            println!("Error: {}", e);
        }
    }
    Ok(())
}
