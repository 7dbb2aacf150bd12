use clap::Parser;
use notecmd::cli::ui::is_interactive;
use notecmd::cli::{
    run_add, run_browse, run_clear, run_config, run_delete, run_duplicate, run_edit, run_export,
    run_import, run_list, run_pin, run_show, Cli, Commands,
};
use notecmd::config::{database_path, NotesConfig};
use notecmd::db::Database;
use notecmd::logging::init_logging;
use notecmd::store::{DbSlot, NoteStore};
use notecmd::view::ViewQuery;

fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let db = Database::open_at(database_path(cli.db)?)?;
    let config = NotesConfig::load(&db)?;

    let mut store = NoteStore::load(
        DbSlot::new(&db, config.storage_key.clone()),
        config.store_options(),
    );

    match cli.command {
        None => {
            // No subcommand: browse when attached to a terminal, list otherwise
            if is_interactive() {
                run_browse(&mut store, &config)?;
            } else {
                run_list(&store, &ViewQuery::default(), false)?;
            }
        }
        Some(Commands::Browse) => {
            run_browse(&mut store, &config)?;
        }
        Some(Commands::Add(args)) => {
            run_add(&mut store, args.title, args.body, args.color)?;
        }
        Some(Commands::List(args)) => {
            let query = ViewQuery::new(args.filter, args.search.unwrap_or_default());
            run_list(&store, &query, args.json)?;
        }
        Some(Commands::Show(args)) => {
            run_show(&store, &args.identifier)?;
        }
        Some(Commands::Edit(args)) => {
            run_edit(&mut store, &args.identifier, args.title, args.body, args.color)?;
        }
        Some(Commands::Pin(args)) => {
            run_pin(&mut store, &args.identifier)?;
        }
        Some(Commands::Dup(args)) => {
            run_duplicate(&mut store, &args.identifier)?;
        }
        Some(Commands::Rm(args)) => {
            run_delete(&mut store, &args.identifier, args.force)?;
        }
        Some(Commands::Export(args)) => {
            run_export(&store, args.path.as_deref())?;
        }
        Some(Commands::Import(args)) => {
            run_import(&mut store, args.path.as_deref(), args.dry_run)?;
        }
        Some(Commands::Clear(args)) => {
            run_clear(&mut store, args.force)?;
        }
        Some(Commands::Config(args)) => {
            run_config(&db, &config, args.action)?;
        }
    }

    Ok(())
}
