use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use jobtrack::clock::{Clock, FixedClock, SystemClock};
use jobtrack::config::Config;
use jobtrack::db::Database;
use jobtrack::logging::init_logging;
use jobtrack::models::{
    parse_date, Contact, Interview, InterviewType, JobOffer, OfferStatus, ProfileUpdate,
    StatusHistoryEntry, Task, TaskPriority, TaskStatus,
};
use jobtrack::offers::{CompanyDetails, CompanyRef, OfferUpdate};
use jobtrack::views;
use jobtrack::Tracker;

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Track job applications, companies and follow-up tasks")]
struct Cli {
    /// Database file (defaults to the user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Act as if the current time were this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, global = true, value_parser = parse_date_arg)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log in to an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log out (data is kept)
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Update profile fields
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// Comma-separated list of skills
        #[arg(long)]
        skills: Option<String>,
    },

    /// Delete the logged-in account and all its offers and tasks
    DeleteAccount {
        #[arg(long)]
        yes: bool,
    },

    /// Add a job offer
    Add {
        /// Job title
        title: String,

        #[arg(short, long)]
        company: String,

        /// to-apply, applied, interview, offer, rejected, to-relaunch, no-response
        #[arg(short, long, default_value = "to-apply")]
        status: OfferStatus,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        salary: Option<String>,

        #[arg(long)]
        contract: Option<String>,

        #[arg(long)]
        link: Option<String>,

        /// Date the offer was found (defaults to now)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<DateTime<Utc>>,

        /// Company description, shared by all offers of the company
        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_parser = parse_date_arg)]
        interview_date: Option<DateTime<Utc>>,

        /// prequal, onsite, phone or video
        #[arg(long)]
        interview_type: Option<InterviewType>,
    },

    /// Edit offer fields
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        salary: Option<String>,
        #[arg(long)]
        contract: Option<String>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        missions: Option<String>,
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        benefits: Option<String>,
        #[arg(long)]
        process: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// List offers
    List {
        #[arg(short, long)]
        status: Option<OfferStatus>,

        #[arg(short, long)]
        company: Option<String>,
    },

    /// Show offer details
    Show { id: i64 },

    /// Change an offer's status
    Status { id: i64, status: OfferStatus },

    /// Record an interview (moves the offer to Interview)
    Interview {
        id: i64,
        #[arg(long, value_parser = parse_date_arg)]
        date: DateTime<Utc>,
        /// prequal, onsite, phone or video
        #[arg(long = "type")]
        kind: InterviewType,
    },

    /// Show or replace an offer's interviews
    Interviews {
        id: i64,
        /// DATE=TYPE, repeatable; replaces the whole list
        #[arg(long = "entry")]
        entries: Vec<String>,
        /// Remove all interviews
        #[arg(long)]
        clear: bool,
    },

    /// Show or replace an offer's status history
    History {
        id: i64,
        /// DATE=STATUS, repeatable; replaces the whole history
        #[arg(long = "entry")]
        entries: Vec<String>,
    },

    /// Delete an offer
    Delete { id: i64 },

    /// Companies derived from offers
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Dashboard numbers
    Stats,

    /// Month-by-month status chart
    Chart {
        #[arg(short, long, default_value = "6")]
        months: u32,
    },

    /// Show what the follow-up sweep changed on startup
    Sweep,

    /// Export all data as JSON
    Export {
        /// Output file (stdout if omitted)
        path: Option<PathBuf>,
    },

    /// Replace all data with a JSON export
    Import { path: PathBuf },

    /// Delete every account and all data
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// List companies
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show company details
    Show {
        /// Company name or ID
        name: String,
    },

    /// Update company details on every offer of the company
    Update {
        /// Company name or ID
        name: String,
        #[arg(long)]
        employees: Option<u32>,
        #[arg(long)]
        founded: Option<i32>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// NAME[|ROLE[|EMAIL[|PHONE]]], repeatable; replaces the contact list
        #[arg(long = "contact")]
        contacts: Vec<String>,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a task
    Add {
        title: String,
        #[arg(long, value_parser = parse_date_arg)]
        due: Option<DateTime<Utc>>,
        /// high, medium or low
        #[arg(short, long, default_value = "medium")]
        priority: TaskPriority,
        /// Related offer label, repeatable
        #[arg(long = "offer")]
        offers: Vec<String>,
        #[arg(long)]
        link: Option<String>,
    },

    /// List tasks
    List {
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
    },

    /// Flip a task between done and to-do
    Toggle { id: i64 },

    /// Set a task's status (todo, in-progress, done)
    Status { id: i64, status: TaskStatus },

    /// Move a task to a position in the list (0 = top)
    Move { id: i64, position: usize },

    /// Delete a task
    Delete { id: i64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.db.clone());
    init_logging(&config.log_filter);

    let db = Database::open(&config.db_path)
        .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?;
    let clock: Box<dyn Clock> = match cli.now {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    };
    let mut tracker = Tracker::open(db, clock);

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => {
            let user = tracker.register(&name, &email, &password)?;
            println!("Registered and logged in as {} <{}>", user.full_name, user.email);
        }

        Commands::Login { email, password } => {
            let user = tracker.login(&email, &password)?;
            println!("Logged in as {} <{}>", user.full_name, user.email);
        }

        Commands::Logout => {
            tracker.logout();
            println!("Logged out.");
        }

        Commands::Whoami => match tracker.current_user() {
            Some(user) => {
                println!("{} <{}>", user.full_name, user.email);
                if let Some(title) = &user.title {
                    println!("Title: {}", title);
                }
                if let Some(location) = &user.location {
                    println!("Location: {}", location);
                }
                if !user.skills.is_empty() {
                    println!("Skills: {}", user.skills.join(", "));
                }
                if let Some(bio) = &user.bio {
                    println!("\n{}", textwrap::fill(bio, 80));
                }
                println!("Member since {}", user.created_at.format("%Y-%m-%d"));
            }
            None => println!("Not logged in."),
        },

        Commands::Profile {
            name,
            title,
            location,
            bio,
            skills,
        } => {
            let update = ProfileUpdate {
                full_name: name,
                title,
                location,
                bio,
                skills: skills.map(|s| s.split(',').map(str::to_string).collect()),
            };
            let user = tracker.update_profile(update)?;
            println!("Profile updated for {}.", user.full_name);
        }

        Commands::DeleteAccount { yes } => {
            tracker.require_user()?;
            if !yes {
                println!("This deletes the account and all its data. Re-run with --yes to confirm.");
            } else {
                let user = tracker.delete_current_user()?;
                println!("Deleted account {}.", user.email);
            }
        }

        Commands::Add {
            title,
            company,
            status,
            location,
            salary,
            contract,
            link,
            date,
            description,
            interview_date,
            interview_type,
        } => {
            tracker.require_user()?;
            let added = date.unwrap_or_else(|| tracker.now());
            let mut offer = JobOffer::new(title, company, status, added);
            offer.location = location.unwrap_or_default();
            offer.salary = salary;
            offer.contract_type = contract;
            offer.link = link;
            offer.company_description = description;
            offer.interview_date = interview_date;
            offer.interview_type = interview_type;
            let id = tracker.add_offer(offer);
            println!("Added offer #{}", id);
        }

        Commands::Edit {
            id,
            title,
            company,
            location,
            salary,
            contract,
            link,
            missions,
            profile,
            benefits,
            process,
            notes,
            description,
        } => {
            tracker.require_user()?;
            let mut offer = find_offer(&tracker, id)?;
            if let Some(title) = title {
                offer.title = title;
            }
            if let Some(company) = company {
                offer.company = company;
            }
            if let Some(location) = location {
                offer.location = location;
            }
            set_text(&mut offer.salary, salary);
            set_text(&mut offer.contract_type, contract);
            set_text(&mut offer.link, link);
            set_text(&mut offer.missions, missions);
            set_text(&mut offer.profile, profile);
            set_text(&mut offer.benefits, benefits);
            set_text(&mut offer.recruitment_process, process);
            set_text(&mut offer.others, notes);
            set_text(&mut offer.company_description, description);
            tracker.update_offer(offer);
            println!("Updated offer #{}", id);
        }

        Commands::List { status, company } => {
            tracker.require_user()?;
            let offers: Vec<&JobOffer> = tracker
                .offers()
                .offers()
                .iter()
                .filter(|o| status.is_none_or(|s| o.status == s))
                .filter(|o| {
                    company
                        .as_deref()
                        .is_none_or(|c| o.company.eq_ignore_ascii_case(c))
                })
                .collect();
            if offers.is_empty() {
                println!("No offers found.");
            } else {
                println!(
                    "{:<6} {:<14} {:<30} {:<20} {:<11}",
                    "ID", "STATUS", "TITLE", "COMPANY", "ADDED"
                );
                println!("{}", "-".repeat(84));
                for offer in offers {
                    println!(
                        "{:<6} {:<14} {:<30} {:<20} {:<11}",
                        offer.id,
                        offer.status.label(),
                        truncate(&offer.title, 28),
                        truncate(&offer.company, 18),
                        offer.date_added.format("%Y-%m-%d")
                    );
                }
            }
        }

        Commands::Show { id } => {
            tracker.require_user()?;
            match tracker.offers().get_offer(id) {
                Some(offer) => print_offer(offer, tracker.now()),
                None => println!("Offer #{} not found.", id),
            }
        }

        Commands::Status { id, status } => {
            tracker.require_user()?;
            let mut offer = find_offer(&tracker, id)?;
            let previous = offer.status;
            offer.status = status;
            tracker.update_offer(offer);
            println!("Offer #{}: {} -> {}", id, previous.label(), status.label());
        }

        Commands::Interview { id, date, kind } => {
            tracker.require_user()?;
            let mut offer = find_offer(&tracker, id)?;
            offer.status = OfferStatus::Interview;
            offer.interview_date = Some(date);
            offer.interview_type = Some(kind);
            let tasks_before = tracker.tasks().tasks().len();
            tracker.update_offer(offer);
            println!("Recorded {} on {} for offer #{}", kind, date.format("%Y-%m-%d"), id);
            if tracker.tasks().tasks().len() > tasks_before {
                println!("Added a preparation task.");
            }
        }

        Commands::Interviews { id, entries, clear } => {
            tracker.require_user()?;
            let offer = find_offer(&tracker, id)?;
            if entries.is_empty() && !clear {
                let now = tracker.now();
                print_interviews(&offer, now);
            } else {
                let interviews = entries
                    .iter()
                    .map(|e| parse_interview(e))
                    .collect::<Result<Vec<_>>>()?;
                let count = interviews.len();
                tracker.update_offer(OfferUpdate::new(offer).with_interviews(interviews));
                println!("Offer #{} now has {} interview(s).", id, count);
            }
        }

        Commands::History { id, entries } => {
            tracker.require_user()?;
            let offer = find_offer(&tracker, id)?;
            if entries.is_empty() {
                for entry in offer.sorted_history() {
                    println!("{}  {}", entry.date.format("%Y-%m-%d %H:%M"), entry.status.label());
                }
            } else {
                let history = entries
                    .iter()
                    .map(|e| parse_history_entry(e))
                    .collect::<Result<Vec<_>>>()?;
                tracker.update_offer(OfferUpdate::new(offer).with_history(history));
                if let Some(offer) = tracker.offers().get_offer(id) {
                    println!("History replaced; offer #{} is now {}.", id, offer.status.label());
                }
            }
        }

        Commands::Delete { id } => {
            tracker.require_user()?;
            if tracker.delete_offer(id) {
                println!("Deleted offer #{}", id);
            } else {
                println!("Offer #{} not found.", id);
            }
        }

        Commands::Company { command } => {
            tracker.require_user()?;
            match command {
                CompanyCommands::List { search } => {
                    let companies = views::company_summaries(tracker.offers().offers(), &search);
                    if companies.is_empty() {
                        println!("No companies found.");
                    } else {
                        println!("{:<6} {:<30} {:<7} {:<40}", "ID", "NAME", "OFFERS", "STATUSES");
                        println!("{}", "-".repeat(86));
                        for company in companies {
                            println!(
                                "{:<6} {:<30} {:<7} {:<40}",
                                company.id.map(|id| id.to_string()).unwrap_or_default(),
                                truncate(&company.name, 28),
                                company.offer_count,
                                company.status_counts.breakdown()
                            );
                        }
                    }
                }

                CompanyCommands::Show { name } => {
                    match tracker.get_company(&CompanyRef::parse(&name)) {
                        Some(company) => {
                            println!("Company: {}", company.name);
                            if let Some(id) = company.info.id {
                                println!("ID: {}", id);
                            }
                            if let Some(employees) = company.info.employees {
                                println!("Employees: {}", employees);
                            }
                            if let Some(founded) = company.info.founded {
                                println!("Founded: {}", founded);
                            }
                            if let Some(group) = &company.info.group {
                                println!("Group: {}", group);
                            }
                            if let Some(description) = &company.description {
                                println!("\n{}", textwrap::fill(description, 80));
                            }
                            if !company.info.contacts.is_empty() {
                                println!("\nContacts:");
                                for contact in &company.info.contacts {
                                    println!("  {}", format_contact(contact));
                                }
                            }
                            println!("\nOffers ({}):", company.offers.len());
                            for offer in &company.offers {
                                println!("  #{} - {} ({})", offer.id, offer.title, offer.status.label());
                            }
                        }
                        None => println!("Company '{}' not found.", name),
                    }
                }

                CompanyCommands::Update {
                    name,
                    employees,
                    founded,
                    group,
                    description,
                    contacts,
                } => {
                    let company = tracker
                        .get_company(&CompanyRef::parse(&name))
                        .ok_or_else(|| anyhow!("Company '{}' not found", name))?;
                    let contacts = if contacts.is_empty() {
                        None
                    } else {
                        Some(contacts.iter().map(|c| parse_contact(c)).collect::<Result<Vec<_>>>()?)
                    };
                    let details = CompanyDetails {
                        employees,
                        founded,
                        group,
                        contacts,
                        description,
                    };
                    tracker.update_company_details(&company.name, &details);
                    println!("Updated {} ({} offer(s)).", company.name, company.offers.len());
                }
            }
        }

        Commands::Task { command } => {
            tracker.require_user()?;
            match command {
                TaskCommands::Add {
                    title,
                    due,
                    priority,
                    offers,
                    link,
                } => {
                    let due = due.unwrap_or_else(|| tracker.now());
                    let mut task = Task::new(title, due, priority);
                    task.related_offers = offers;
                    task.link = link;
                    let id = tracker.tasks_mut().add_task(task);
                    println!("Added task #{}", id);
                }

                TaskCommands::List { all } => {
                    let tasks: Vec<&Task> = tracker
                        .tasks()
                        .tasks()
                        .iter()
                        .filter(|t| all || !t.completed)
                        .collect();
                    if tasks.is_empty() {
                        println!("No tasks.");
                    } else {
                        println!(
                            "{:<6} {:<9} {:<8} {:<11} {:<40}",
                            "ID", "STATUS", "PRIORITY", "DUE", "TITLE"
                        );
                        println!("{}", "-".repeat(78));
                        for task in tasks {
                            println!(
                                "{:<6} {:<9} {:<8} {:<11} {:<40}",
                                task.id,
                                task.status.label(),
                                task.priority.label(),
                                task.due_date.format("%Y-%m-%d"),
                                truncate(&task.title, 38)
                            );
                            for related in &task.related_offers {
                                println!("{:<37}↳ {}", "", truncate(related, 60));
                            }
                        }
                    }
                }

                TaskCommands::Toggle { id } => {
                    if !tracker.tasks_mut().toggle_task(id) {
                        bail!("Task #{} not found", id);
                    }
                    if let Some(task) = tracker.tasks().get_task(id) {
                        println!("Task #{} is now {}.", id, task.status.label());
                    }
                }

                TaskCommands::Status { id, status } => {
                    if !tracker.tasks_mut().set_status(id, status) {
                        bail!("Task #{} not found", id);
                    }
                    println!("Task #{} is now {}.", id, status.label());
                }

                TaskCommands::Move { id, position } => {
                    if !tracker.tasks_mut().move_task(id, position) {
                        bail!("Task #{} not found", id);
                    }
                    println!("Moved task #{}.", id);
                }

                TaskCommands::Delete { id } => {
                    if tracker.tasks_mut().delete_task(id) {
                        println!("Deleted task #{}", id);
                    } else {
                        println!("Task #{} not found.", id);
                    }
                }
            }
        }

        Commands::Stats => {
            tracker.require_user()?;
            let stats = views::dashboard_stats(tracker.offers().offers());
            println!("Candidatures envoyées: {}", stats.sent);
            println!("En attente:            {}", stats.pending);
            println!("Entretiens:            {}", stats.interviews);
            println!("Refus:                 {}", stats.rejected);
            println!("Taux de réponses:      {:.0}%", stats.response_rate * 100.0);
            println!("À postuler:            {}", stats.to_apply);
            println!("Entreprises:           {}", stats.companies);

            let now = tracker.now();
            let due = tracker.tasks().due_soon(now, 7);
            if !due.is_empty() {
                println!("\nTasks due this week:");
                for task in due {
                    println!("  #{} {} ({})", task.id, task.title, task.due_date.format("%Y-%m-%d"));
                }
            }

            let activity = views::recent_activity(tracker.offers().offers(), 5);
            if !activity.is_empty() {
                println!("\nRecent activity:");
                for item in activity {
                    println!(
                        "  {}  {} - {} ({})",
                        item.date.format("%Y-%m-%d"),
                        item.title,
                        item.company,
                        item.status.label()
                    );
                }
            }
        }

        Commands::Chart { months } => {
            tracker.require_user()?;
            let series = views::monthly_series(tracker.offers().offers(), tracker.now(), months);
            print!("{:<9}", "MONTH");
            for status in OfferStatus::ALL {
                print!(" {:>12}", truncate(status.label(), 12));
            }
            println!();
            for point in series {
                print!("{:<9}", point.month.format("%Y-%m"));
                for (_, count) in point.counts.iter() {
                    print!(" {:>12}", count);
                }
                println!();
            }
        }

        Commands::Sweep => {
            let moved = tracker.last_sweep();
            if moved.is_empty() {
                println!("No offers needed a follow-up.");
            } else {
                for t in moved {
                    print!("Offer #{}: {} -> {}", t.offer_id, t.from.label(), t.to.label());
                    match t.task_id {
                        Some(task_id) => println!(" (task #{})", task_id),
                        None => println!(),
                    }
                }
            }
        }

        Commands::Export { path } => {
            let json = tracker.export_json()?;
            match path {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write to {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Import { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            tracker.import_json(&raw)?;
            println!("Imported {}", path.display());
        }

        Commands::Reset { yes } => {
            if !yes {
                println!("This deletes every account and all data. Re-run with --yes to confirm.");
            } else {
                tracker.clear_all()?;
                println!("All data cleared.");
            }
        }
    }

    Ok(())
}

fn find_offer(tracker: &Tracker, id: i64) -> Result<JobOffer> {
    tracker
        .offers()
        .get_offer(id)
        .cloned()
        .ok_or_else(|| anyhow!("Offer #{} not found", id))
}

fn print_offer(offer: &JobOffer, now: DateTime<Utc>) {
    println!("Offer #{}", offer.id);
    println!("Title: {}", offer.title);
    print!("Company: {}", offer.company);
    match offer.company_info.id {
        Some(id) => println!(" (#{})", id),
        None => println!(),
    }
    println!("Status: {}", offer.status.label());
    if !offer.location.is_empty() {
        println!("Location: {}", offer.location);
    }
    if let Some(salary) = &offer.salary {
        println!("Salary: {}", salary);
    }
    if let Some(contract) = &offer.contract_type {
        println!("Contract: {}", contract);
    }
    if let Some(link) = &offer.link {
        println!("Link: {}", link);
    }
    println!("Added: {}", offer.date_added.format("%Y-%m-%d"));

    let sections = [
        ("Company", &offer.company_description),
        ("Missions", &offer.missions),
        ("Profile", &offer.profile),
        ("Benefits", &offer.benefits),
        ("Recruitment process", &offer.recruitment_process),
        ("Notes", &offer.others),
    ];
    for (heading, text) in sections {
        if let Some(text) = text {
            println!("\n--- {} ---\n{}", heading, textwrap::fill(text, 80));
        }
    }

    println!("\n--- History ---");
    for entry in offer.sorted_history() {
        println!("{}  {}", entry.date.format("%Y-%m-%d"), entry.status.label());
    }
    if !offer.interviews.is_empty() {
        println!();
        print_interviews(offer, now);
    }
}

fn print_interviews(offer: &JobOffer, now: DateTime<Utc>) {
    let upcoming = offer.upcoming_interviews(now);
    let past = offer.past_interviews(now);
    if upcoming.is_empty() && past.is_empty() {
        println!("No interviews.");
        return;
    }
    if !upcoming.is_empty() {
        println!("Upcoming interviews:");
        for i in upcoming {
            println!("  {}  {}", i.date.format("%Y-%m-%d"), i.kind);
        }
    }
    if !past.is_empty() {
        println!("Past interviews:");
        for i in past {
            println!("  {}  {}", i.date.format("%Y-%m-%d"), i.kind);
        }
    }
}

fn parse_date_arg(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_date(s).ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}

fn split_pair(raw: &str) -> Result<(DateTime<Utc>, &str)> {
    let (date, rest) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected DATE=VALUE, got '{}'", raw))?;
    let date = parse_date(date).ok_or_else(|| anyhow!("Invalid date '{}'", date))?;
    Ok((date, rest))
}

fn parse_interview(raw: &str) -> Result<Interview> {
    let (date, kind) = split_pair(raw)?;
    let kind = kind.parse::<InterviewType>().map_err(|e| anyhow!(e))?;
    Ok(Interview::new(date, kind))
}

fn parse_history_entry(raw: &str) -> Result<StatusHistoryEntry> {
    let (date, status) = split_pair(raw)?;
    let status = status.parse::<OfferStatus>().map_err(|e| anyhow!(e))?;
    Ok(StatusHistoryEntry::new(status, date))
}

fn parse_contact(raw: &str) -> Result<Contact> {
    let mut parts = raw.split('|').map(str::trim);
    let name = parts
        .next()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| anyhow!("Contact needs a name: '{}'", raw))?;
    let mut field = || parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    Ok(Contact {
        name: name.to_string(),
        role: field(),
        email: field(),
        phone: field(),
    })
}

fn format_contact(contact: &Contact) -> String {
    let mut out = contact.name.clone();
    for extra in [&contact.role, &contact.email, &contact.phone].into_iter().flatten() {
        out.push_str(" | ");
        out.push_str(extra);
    }
    out
}

fn set_text(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *field = if value.trim().is_empty() { None } else { Some(value) };
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
