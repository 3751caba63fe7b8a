//! Subcommand handlers. Each one drives client state and workflows, then
//! prints a screen.

use std::io::Write as _;
use std::ops::Range;
use std::time::Duration;

use client::net::api::HttpBackend;
use client::net::live::LiveSubscription;
use client::reorder::{InsertPosition, InsertionMarker};
use client::state::draft::SetField;
use client::state::history::{HistoryEvent, PAGE_SIZE};
use client::state::templates::TemplateEditor;
use client::stats::{compute_stats, exercise_progress};
use client::{AppContext, Backend, FileStore, workflow};
use records::{ExerciseDef, merge_catalog};
use time::OffsetDateTime;

use crate::screens;
use crate::{CliError, ExercisesCommand, HistoryArgs, ProfileCommand, TemplatesCommand, ThemeCommand, WorkoutCommand};

type Ctx = AppContext<FileStore>;

// =============================================================================
// HELPERS
// =============================================================================

/// Case-insensitive catalog lookup.
pub(crate) fn find_exercise(catalog: &[ExerciseDef], name: &str) -> Result<ExerciseDef, CliError> {
    let needle = name.trim();
    catalog
        .iter()
        .find(|def| def.name.eq_ignore_ascii_case(needle))
        .cloned()
        .ok_or_else(|| CliError::UnknownExercise(needle.to_owned()))
}

/// 1-based position to index, checked against `len`.
pub(crate) fn to_index(position: usize, len: usize, what: &'static str) -> Result<usize, CliError> {
    position
        .checked_sub(1)
        .filter(|i| *i < len)
        .ok_or(CliError::BadPosition { what, position })
}

fn page_size() -> usize {
    usize::try_from(PAGE_SIZE).unwrap_or(usize::MAX)
}

/// Index range of 1-based `page` within `len` loaded items.
pub(crate) fn page_range(page: usize, len: usize) -> Option<Range<usize>> {
    let start = page.checked_sub(1)?.checked_mul(page_size())?;
    (start < len).then(|| start..len.min(start + page_size()))
}

fn draft_exercise(ctx: &Ctx, name: &str) -> Result<String, CliError> {
    ctx.draft
        .draft()
        .selected_exercises
        .iter()
        .find(|def| def.name.eq_ignore_ascii_case(name.trim()))
        .map(|def| def.name.clone())
        .ok_or_else(|| CliError::UnknownExercise(name.to_owned()))
}

// =============================================================================
// HOME / IDENTITY
// =============================================================================

pub(crate) async fn home(ctx: &mut Ctx, backend: &HttpBackend) -> Result<(), CliError> {
    let now = OffsetDateTime::now_utc();
    println!("{}", screens::greeting(ctx.session.user()));
    ctx.draft.tick(&mut ctx.store, now)?;
    println!("{}", screens::draft(ctx.draft.draft()));

    if ctx.session.current().is_none() {
        return Ok(());
    }
    match workflow::stats_history(ctx, backend, now).await {
        Ok(history) => {
            let stats = compute_stats(&history.workouts);
            println!(
                "{} workout(s) logged; most frequent: {}",
                stats.total_workouts,
                stats.most_frequent_exercise.as_deref().unwrap_or("-")
            );
        }
        Err(e) => tracing::warn!(error = %e, "quick stats unavailable"),
    }
    Ok(())
}

pub(crate) async fn login(ctx: &mut Ctx, backend: &HttpBackend, email: &str, password: &str) -> Result<(), CliError> {
    let user = workflow::login(ctx, backend, email, password).await?;
    println!("Signed in as {}.", user.name);
    Ok(())
}

pub(crate) async fn register(ctx: &mut Ctx, backend: &HttpBackend, email: &str, password: &str) -> Result<(), CliError> {
    let user = workflow::register(ctx, backend, email, password).await?;
    println!("Account created. Signed in as {}.", user.name);
    Ok(())
}

pub(crate) async fn logout(ctx: &mut Ctx, backend: &HttpBackend) -> Result<(), CliError> {
    workflow::logout(ctx, backend).await?;
    println!("Signed out.");
    Ok(())
}

pub(crate) async fn login_github(ctx: &mut Ctx, base_url: &str, token: Option<String>) -> Result<(), CliError> {
    let Some(token) = token else {
        let backend = HttpBackend::new(base_url, None)?;
        println!("Open {} in a browser.", backend.github_login_url());
        println!("After signing in, run `liftbook login-github --token <TOKEN>` with the returned token.");
        return Ok(());
    };
    let backend = HttpBackend::new(base_url, Some(&token))?;
    let user = workflow::adopt_token(ctx, &backend, token).await?;
    println!("Signed in with GitHub as {}.", user.name);
    Ok(())
}

pub(crate) async fn profile(ctx: &mut Ctx, backend: &HttpBackend, cmd: ProfileCommand) -> Result<(), CliError> {
    match cmd {
        ProfileCommand::Show => {
            let user = backend.me().await?;
            ctx.session.update_user(&mut ctx.store, user.clone())?;
            println!("{}", screens::profile(&user));
        }
        ProfileCommand::Rename { name } => {
            let user = workflow::update_name(ctx, backend, &name).await?;
            println!("{}", screens::profile(&user));
        }
        ProfileCommand::Picture { path } => {
            let bytes = std::fs::read(&path)?;
            let user = workflow::upload_picture(ctx, backend, bytes).await?;
            println!("{}", screens::profile(&user));
        }
        ProfileCommand::DeleteAccount { password } => {
            workflow::delete_account(ctx, backend, &password).await?;
            println!("Account deleted.");
        }
    }
    Ok(())
}

pub(crate) fn theme(ctx: &mut Ctx, cmd: ThemeCommand) -> Result<(), CliError> {
    if matches!(cmd, ThemeCommand::Toggle) {
        ctx.theme = ctx.theme.toggle(&mut ctx.store)?;
    }
    println!("theme: {}", ctx.theme);
    Ok(())
}

// =============================================================================
// HISTORY
// =============================================================================

pub(crate) async fn history(ctx: &mut Ctx, backend: &HttpBackend, base_url: &str, args: HistoryArgs) -> Result<(), CliError> {
    ctx.user_id()?;
    match ctx.history.load_first_page(&mut ctx.store, backend).await {
        Ok(_) => {
            while ctx.history.workouts().len() < args.page.saturating_mul(page_size()) && ctx.history.has_more() {
                if ctx.history.load_next_page(backend).await? == 0 {
                    break;
                }
            }
        }
        Err(e) if ctx.history.is_snapshot() => {
            tracing::warn!(error = %e, "history unavailable; showing saved copy");
            println!("(offline: showing saved recent workouts)");
        }
        Err(e) => return Err(e.into()),
    }

    let loaded = ctx.history.workouts();
    match page_range(args.page, loaded.len()) {
        Some(range) if args.json => println!("{}", serde_json::to_string_pretty(&loaded[range])?),
        Some(range) => {
            for workout in &loaded[range] {
                println!("{}", screens::workout_line(workout));
            }
        }
        None => println!("No workouts on page {}.", args.page),
    }

    if args.follow {
        follow(ctx, backend, base_url).await?;
    }
    Ok(())
}

async fn follow(ctx: &mut Ctx, backend: &HttpBackend, base_url: &str) -> Result<(), CliError> {
    let ticket = backend.ws_ticket().await?;
    let mut live = LiveSubscription::connect(base_url, &ticket).await?;
    println!("Following new workouts; Ctrl-C to stop.");
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            event = live.next_event() => {
                let Some(event) = event? else {
                    println!("Live connection closed.");
                    break;
                };
                let Some(change) = HistoryEvent::from_live(event) else {
                    continue;
                };
                let line = match &change {
                    HistoryEvent::Created(workout) => screens::workout_line(workout),
                    HistoryEvent::Cleared => "Account deleted.".to_owned(),
                };
                let cleared = matches!(change, HistoryEvent::Cleared);
                if ctx.history.apply_event(&mut ctx.store, change)? {
                    println!("{line}");
                }
                if cleared {
                    break;
                }
            }
            _ = ticker.tick() => {
                ctx.draft.tick(&mut ctx.store, OffsetDateTime::now_utc())?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

// =============================================================================
// WORKOUT
// =============================================================================

pub(crate) async fn workout(ctx: &mut Ctx, backend: &HttpBackend, cmd: WorkoutCommand) -> Result<(), CliError> {
    let now = OffsetDateTime::now_utc();
    ctx.draft.tick(&mut ctx.store, now)?;
    match cmd {
        WorkoutCommand::Start { template: Some(id) } => {
            workflow::start_from_template(ctx, backend, id, now).await?;
        }
        WorkoutCommand::Start { template: None } => ctx.draft.start(&mut ctx.store, now)?,
        WorkoutCommand::Add { name } => {
            let def = find_exercise(&workflow::exercise_catalog(backend).await?, &name)?;
            let display = def.name.clone();
            if !ctx.draft.add_exercise(&mut ctx.store, def, now)? {
                println!("{display} is already in this workout.");
            }
        }
        WorkoutCommand::Set { exercise, position, weight, reps } => {
            let name = draft_exercise(ctx, &exercise)?;
            let index = position.checked_sub(1).ok_or(CliError::BadPosition { what: "set", position })?;
            for (field, value) in [(SetField::Weight, weight), (SetField::Reps, reps)] {
                let Some(value) = value else { continue };
                if !ctx.draft.update_set(&mut ctx.store, &name, index, field, &value)? {
                    return Err(CliError::BadPosition { what: "set", position });
                }
            }
        }
        WorkoutCommand::AddSet { exercise } => {
            let name = draft_exercise(ctx, &exercise)?;
            ctx.draft.add_set(&mut ctx.store, &name)?;
        }
        WorkoutCommand::Remove { exercise } => {
            let name = draft_exercise(ctx, &exercise)?;
            ctx.draft.remove_exercise(&mut ctx.store, &name)?;
        }
        WorkoutCommand::Show => {}
        WorkoutCommand::Finish => {
            let stored = workflow::finish_workout(ctx, backend, now).await?;
            println!("Workout saved.\n{}", screens::workout_line(&stored));
            return Ok(());
        }
        WorkoutCommand::Discard => {
            ctx.draft.clear(&mut ctx.store)?;
            println!("Workout discarded.");
            return Ok(());
        }
        WorkoutCommand::Rest { secs } => return rest(ctx, secs).await,
    }
    println!("{}", screens::draft(ctx.draft.draft()));
    Ok(())
}

async fn rest(ctx: &mut Ctx, secs: u64) -> Result<(), CliError> {
    ctx.rest.start(secs);
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;
    let mut stdout = std::io::stdout();

    while let Some(remaining) = ctx.rest.remaining() {
        write!(stdout, "\rrest {remaining:>4}s")?;
        stdout.flush()?;
        tokio::select! {
            _ = ticker.tick() => {
                ctx.draft.tick(&mut ctx.store, OffsetDateTime::now_utc())?;
                if ctx.rest.tick() {
                    writeln!(stdout, "\rRest over.     ")?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                ctx.rest.cancel();
                writeln!(stdout, "\rRest cancelled.")?;
            }
        }
    }
    Ok(())
}

// =============================================================================
// EXERCISES / TEMPLATES
// =============================================================================

pub(crate) async fn exercises(backend: &HttpBackend, cmd: ExercisesCommand) -> Result<(), CliError> {
    match cmd {
        ExercisesCommand::List => {
            let custom = backend.list_exercises().await?;
            for def in merge_catalog(&custom) {
                let own = custom.iter().find(|c| c.def.name.eq_ignore_ascii_case(&def.name));
                println!("{}", screens::catalog_line(&def, own));
            }
        }
        ExercisesCommand::Add { name, category, muscle } => {
            let created = backend.create_exercise(&ExerciseDef::new(name, category, muscle)).await?;
            println!("Added {} ({}).", created.def.name, created.id);
        }
        ExercisesCommand::Delete { id } => {
            backend.delete_exercise(id).await?;
            println!("Deleted {id}.");
        }
    }
    Ok(())
}

pub(crate) async fn templates(backend: &HttpBackend, cmd: TemplatesCommand) -> Result<(), CliError> {
    let mut editor = match cmd {
        TemplatesCommand::List => {
            for template in backend.list_templates().await? {
                println!("{}", screens::template(&template));
            }
            return Ok(());
        }
        TemplatesCommand::Show { id } => {
            println!("{}", screens::template(&backend.get_template(id).await?));
            return Ok(());
        }
        TemplatesCommand::Delete { id } => {
            backend.delete_template(id).await?;
            println!("Deleted {id}.");
            return Ok(());
        }
        TemplatesCommand::Create { name, exercises } => {
            let catalog = workflow::exercise_catalog(backend).await?;
            let mut editor = TemplateEditor::new(name);
            for exercise in &exercises {
                editor.add_exercise(find_exercise(&catalog, exercise)?);
            }
            editor
        }
        TemplatesCommand::AddExercise { id, name } => {
            let catalog = workflow::exercise_catalog(backend).await?;
            let mut editor = TemplateEditor::from_template(&backend.get_template(id).await?);
            editor.add_exercise(find_exercise(&catalog, &name)?);
            editor
        }
        TemplatesCommand::Move { id, from, to, after } => {
            let mut editor = TemplateEditor::from_template(&backend.get_template(id).await?);
            let len = editor.exercises.len();
            let from = to_index(from, len, "exercise")?;
            let index = to_index(to, len, "exercise")?;
            let position = if after { InsertPosition::After } else { InsertPosition::Before };
            editor.move_exercise(from, InsertionMarker { index, position });
            editor
        }
        TemplatesCommand::RemoveExercise { id, position } => {
            let mut editor = TemplateEditor::from_template(&backend.get_template(id).await?);
            let index = to_index(position, editor.exercises.len(), "exercise")?;
            editor.remove_exercise(index);
            editor
        }
    };
    let saved = editor.save(backend).await?;
    println!("{}", screens::template(&saved));
    Ok(())
}

// =============================================================================
// STATISTICS
// =============================================================================

pub(crate) async fn stats(ctx: &mut Ctx, backend: &HttpBackend, exercise: Option<&str>) -> Result<(), CliError> {
    let history = workflow::stats_history(ctx, backend, OffsetDateTime::now_utc()).await?;
    if history.from_cache {
        tracing::debug!("statistics served from cache");
    }
    let summary = compute_stats(&history.workouts);
    println!("{}", screens::stats(&summary));

    if let Some(wanted) = exercise {
        let name = summary
            .exercise_names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(wanted.trim()))
            .map_or(wanted, String::as_str);
        println!("\n{}", screens::progress(name, &exercise_progress(&history.workouts, name)));
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
