use clap::{Parser, Subcommand};
use recipe_lookup::api::HttpApi;
use recipe_lookup::config::{self, AppConfig};
use recipe_lookup::controller::{App, Event};
use recipe_lookup::output;
use recipe_lookup::state::AppState;
use recipe_lookup::storage::{FileStore, KeyValueStore, MemoryStore};
use recipe_lookup::upload::FormPayload;
use recipe_lookup::views::{Direction, ServingsButton, View};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recipe-lookup")]
#[command(about = "Search, scale, bookmark and upload recipes")]
#[command(long_about = "\
Search, scale, bookmark and upload recipes

Recipes come from a public recipe API. Bookmarks are kept on disk in the
data directory (storage.dir in config.toml) and survive between runs.

Upload forms are flat TOML files:

  title = \"Avocado Rice\"
  publisher = \"Me\"
  sourceUrl = \"https://example.com/avocado-rice\"
  image = \"https://example.com/avocado-rice.jpg\"
  servings = \"2\"
  cookingTime = \"20\"
  ingredient-1 = \"0.5,kg,Rice\"    # quantity,unit,description
  ingredient-2 = \"1,,Avocado\"

Run 'recipe-lookup gen-config' to generate a documented config.toml.
Set RUST_LOG=debug for detailed logs.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Directory for persisted bookmarks (overrides storage.dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// API key used for searches and uploads (overrides api.key)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Write the rendered HTML page to this file when done
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Keep bookmarks in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search recipes by keyword
    Search {
        query: String,
        /// Results page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show one recipe
    Show {
        id: String,
        /// Scale ingredient quantities to this many servings
        #[arg(long)]
        servings: Option<u32>,
        /// Add or remove the recipe from bookmarks
        #[arg(long)]
        toggle_bookmark: bool,
    },
    /// List bookmarked recipes
    Bookmarks {
        /// Remove every bookmark
        #[arg(long)]
        clear: bool,
    },
    /// Upload a recipe from a TOML form file
    Upload { form: PathBuf },
    /// Interactive session
    Shell,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> CliResult {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut config = config::load_config(&cli.config)?;
    if let Some(key) = &cli.api_key {
        config.api.key = key.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.storage.dir = dir.clone();
    }

    if cli.ephemeral {
        run(&cli, &config, MemoryStore::new())
    } else {
        run(&cli, &config, FileStore::new(&config.storage.dir))
    }
}

fn run<S: KeyValueStore>(cli: &Cli, config: &AppConfig, store: S) -> CliResult {
    let api = HttpApi::new(&config.api)?;
    let mut state = AppState::with_bookmarks_key(
        api,
        store,
        config.search.results_per_page,
        &config.storage.bookmarks_key,
    );

    let initial_hash = match &cli.command {
        Command::Show { id, .. } => id.as_str(),
        _ => "",
    };
    if let Command::Bookmarks { clear: true } = cli.command {
        state.clear_bookmarks()?;
    }

    let mut app = App::new(state, &config.ui, initial_hash);
    app.start();

    match &cli.command {
        Command::Search { query, page } => {
            app.dispatch(Event::Search(query.clone()));
            if *page > 1 {
                app.control_pagination(*page);
            }
            if let Some(failure) = app.results_view().failure() {
                return Err(failure.into());
            }
            output::print_search_output(app.state().search());
        }
        Command::Show {
            servings,
            toggle_bookmark,
            ..
        } => {
            if let Some(n) = servings {
                app.control_servings(*n);
            }
            if let Some(failure) = app.recipe_view().failure() {
                return Err(failure.into());
            }
            if *toggle_bookmark {
                app.dispatch(Event::ToggleBookmark);
            }
            if let Some(failure) = app.recipe_view().failure() {
                return Err(failure.into());
            }
            match app.state().recipe() {
                Some(recipe) => output::print_recipe(recipe),
                None => return Err(app.recipe_view().region().text_content().into()),
            }
        }
        Command::Bookmarks { .. } => output::print_bookmarks(app.state().bookmarks()),
        Command::Upload { form } => {
            let form = FormPayload::from_toml_file(form)?;
            app.control_add_recipe(&form, Instant::now());
            let message = app.add_recipe_view().region().text_content();
            match app.state().recipe() {
                Some(recipe) if app.location().id() == Some(recipe.id.as_str()) => {
                    println!("{}", message);
                    output::print_recipe(recipe);
                }
                _ => return Err(message.into()),
            }
        }
        Command::Shell => shell(&mut app, cli.output.as_deref())?,
        Command::GenConfig => {}
    }

    if let Some(path) = &cli.output {
        std::fs::write(path, app.render_page())?;
    }
    Ok(())
}

const SHELL_HELP: &str = "\
Commands:
  search <query>    search recipes
  next | prev       move between result pages
  open <id>         open a recipe
  more | less       one serving more or less
  bookmark          toggle the bookmark on the open recipe
  bookmarks         list bookmarks
  upload <file>     upload a recipe from a TOML form
  page              write the rendered page to --output
  help              this text
  quit              leave";

/// Line-oriented session. Each line is one event; timers run between lines.
fn shell<A, S>(app: &mut App<A, S>, output_path: Option<&Path>) -> CliResult
where
    A: recipe_lookup::api::RecipeApi,
    S: KeyValueStore,
{
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", SHELL_HELP)?;

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        app.tick(Instant::now());

        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();
        match command {
            "" => continue,
            "quit" | "exit" | "q" => break,
            "help" => writeln!(stdout, "{}", SHELL_HELP)?,
            "search" => {
                app.dispatch(Event::Search(arg.to_string()));
                print_results(app);
            }
            "next" | "prev" => {
                let direction = if command == "next" {
                    Direction::Next
                } else {
                    Direction::Prev
                };
                app.dispatch(Event::Paginate(direction));
                print_results(app);
            }
            "open" => {
                app.dispatch(Event::HashChange(arg.to_string()));
                print_recipe(app);
            }
            "more" | "less" => {
                let button = if command == "more" {
                    ServingsButton::Increase
                } else {
                    ServingsButton::Decrease
                };
                app.dispatch(Event::Servings(button));
                print_recipe(app);
            }
            "bookmark" => {
                app.dispatch(Event::ToggleBookmark);
                print_recipe(app);
            }
            "bookmarks" => output::print_bookmarks(app.state().bookmarks()),
            "upload" => match FormPayload::from_toml_file(Path::new(arg)) {
                Ok(form) => {
                    app.dispatch(Event::OpenUpload);
                    app.dispatch(Event::Upload(form));
                    writeln!(stdout, "{}", app.add_recipe_view().region().text_content())?;
                }
                Err(e) => writeln!(stdout, "{}", e)?,
            },
            "page" => match output_path {
                Some(path) => {
                    std::fs::write(path, app.render_page())?;
                    writeln!(stdout, "Wrote {}", path.display())?;
                }
                None => writeln!(stdout, "No --output file given")?,
            },
            other => writeln!(stdout, "Unknown command {:?}. Try 'help'.", other)?,
        }
    }
    Ok(())
}

fn print_results<A, S>(app: &App<A, S>)
where
    A: recipe_lookup::api::RecipeApi,
    S: KeyValueStore,
{
    match app.results_view().failure() {
        Some(failure) => println!("{}", failure),
        None => output::print_search_output(app.state().search()),
    }
}

fn print_recipe<A, S>(app: &App<A, S>)
where
    A: recipe_lookup::api::RecipeApi,
    S: KeyValueStore,
{
    if let Some(failure) = app.recipe_view().failure() {
        println!("{}", failure);
        return;
    }
    match app.state().recipe() {
        Some(recipe) => output::print_recipe(recipe),
        None => println!("No recipe open. Try 'open <id>'."),
    }
}
