//! Interactive-style play and replay of a single session from the command line.
use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use reelguess_game::{
    ClueBoard, DateKey, FixtureCatalog, GameMode, GameSession, GameStatus, GuessHistoryEntry,
    GuessOutcome, NamedFeedback, ResultSummary, RuntimeDiff, SessionStorage, YearDiff,
};
use std::io::Write;

/// What to play.
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub mode: GameMode,
    pub date: DateKey,
    pub seed: u64,
    pub guesses: Vec<String>,
}

/// Open the requested session, submit each titled guess and describe the
/// resulting state.
pub fn play_session<S: SessionStorage>(
    out: &mut dyn Write,
    catalog: FixtureCatalog,
    storage: S,
    request: &PlayRequest,
) -> Result<GameStatus> {
    let mut session = match request.mode {
        GameMode::Daily => GameSession::open_daily(catalog, storage, request.date),
        GameMode::Random => GameSession::open_random(catalog, storage, request.date, request.seed),
    }
    .context("could not open session")?;

    writeln!(
        out,
        "{} {} ({} of {} attempts used)",
        "🎬 Session".bright_cyan().bold(),
        session.key().to_string().bright_white(),
        session.attempts(),
        reelguess_game::MAX_ATTEMPTS
    )?;
    for (idx, entry) in session.guesses().iter().enumerate() {
        write_guess(out, idx + 1, entry)?;
    }

    for title in &request.guesses {
        let Some(movie) = session.catalog().find_by_title(title).cloned() else {
            writeln!(out, "⚠️  Unknown title: {}", title.yellow())?;
            continue;
        };
        match session.submit_guess(movie) {
            GuessOutcome::Recorded { attempts, .. } => {
                if let Some(entry) = session.guesses().last() {
                    write_guess(out, attempts, entry)?;
                }
            }
            GuessOutcome::Ignored(status) => {
                writeln!(out, "⏹️  Session already {status}; ignored {}", title.yellow())?;
            }
        }
    }

    write_clue_board(out, &ClueBoard::from_session(&session))?;

    if session.status().is_terminal() {
        let summary = ResultSummary::from_session(&session, Local::now().naive_local());
        write_result(out, &summary, session.mode())?;
    }

    Ok(session.status())
}

fn mark(matched: bool) -> colored::ColoredString {
    if matched { "✓".green() } else { "✗".red() }
}

fn write_guess(out: &mut dyn Write, number: usize, entry: &GuessHistoryEntry) -> Result<()> {
    let feedback = &entry.feedback;
    writeln!(out, "{}. {}", number, entry.movie.title.bold())?;

    let year_note = match feedback.year.diff {
        YearDiff::Exact => "exact".green(),
        YearDiff::Older => "too old".red(),
        YearDiff::Newer => "too recent".red(),
    };
    let runtime_note = match feedback.runtime.diff {
        RuntimeDiff::Exact => "exact".green(),
        RuntimeDiff::Shorter => "too short".red(),
        RuntimeDiff::Longer => "too long".red(),
    };
    writeln!(
        out,
        "   Year {} ({year_note})  Runtime {} min ({runtime_note})",
        feedback.year.value, feedback.runtime.value
    )?;
    writeln!(
        out,
        "   Director {}  Language {} {}",
        mark(feedback.director.matched),
        feedback.language.code.as_deref().unwrap_or("--"),
        mark(feedback.language.matched)
    )?;

    let named = |items: &[NamedFeedback]| {
        items
            .iter()
            .map(|item| format!("{} {}", mark(item.matched), item.name))
            .collect::<Vec<_>>()
            .join(", ")
    };
    writeln!(out, "   Genres: {}", named(&feedback.genres))?;
    writeln!(out, "   Companies: {}", named(&feedback.production_companies))?;
    writeln!(out, "   Countries: {}", named(&feedback.production_countries))?;

    let cast = feedback
        .cast
        .iter()
        .map(|member| {
            let role = if member.is_director() { " (director)" } else { "" };
            format!("{} {}{role}", mark(member.matched), member.name)
        })
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "   Cast: {cast}")?;
    Ok(())
}

fn write_clue_board(out: &mut dyn Write, board: &ClueBoard) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "🔎 Clues".bright_yellow().bold())?;
    if board.is_empty() {
        writeln!(out, "   No clue revealed yet.")?;
        return Ok(());
    }
    writeln!(out, "   Year: {}", board.year_label())?;
    writeln!(out, "   Runtime: {}", board.duration_label())?;
    if let Some(language) = &board.language {
        writeln!(out, "   Language: {language}")?;
    }
    let lists = [
        ("Genres", &board.genres),
        ("Companies", &board.companies),
        ("Countries", &board.countries),
    ];
    for (label, items) in lists {
        if !items.is_empty() {
            writeln!(out, "   {label}: {}", items.join(", "))?;
        }
    }
    if let Some(director) = &board.people.director {
        writeln!(out, "   Director: {}", director.name)?;
    }
    if !board.people.actors.is_empty() {
        let names: Vec<&str> = board
            .people
            .actors
            .iter()
            .map(|person| person.name.as_str())
            .collect();
        writeln!(out, "   Cast: {}", names.join(", "))?;
    }
    Ok(())
}

fn write_result(out: &mut dyn Write, summary: &ResultSummary, mode: GameMode) -> Result<()> {
    writeln!(out)?;
    let headline = match summary.status {
        GameStatus::Won => summary.to_string().bright_green().bold(),
        _ => summary.to_string().bright_red().bold(),
    };
    writeln!(out, "{headline}")?;
    if let Some(poster) = &summary.poster_url {
        writeln!(out, "   Poster: {poster}")?;
    }
    if mode == GameMode::Daily {
        writeln!(out, "   Next puzzle in {}", summary.countdown())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelguess_game::{MemoryStorage, MovieCatalog};

    fn request(guesses: &[&str]) -> PlayRequest {
        PlayRequest {
            mode: GameMode::Daily,
            date: "2026-10-16".parse().unwrap(),
            seed: 0,
            guesses: guesses.iter().map(ToString::to_string).collect(),
        }
    }

    fn mystery_title(catalog: &FixtureCatalog, date: DateKey) -> Option<String> {
        let id = reelguess_game::DailySelector::select(date, catalog.candidate_ids()).ok()?;
        catalog.fetch_details(id).ok().map(|movie| movie.title)
    }

    #[test]
    fn unknown_titles_are_skipped() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let catalog = FixtureCatalog::bundled().unwrap();
        let status = play_session(
            &mut out,
            catalog,
            MemoryStorage::new(),
            &request(&["Not A Real Movie"]),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(status, GameStatus::Playing);
        assert!(text.contains("Unknown title: Not A Real Movie"));
        assert!(text.contains("No clue revealed yet."));
    }

    #[test]
    fn guessing_the_mystery_prints_result() {
        colored::control::set_override(false);
        let catalog = FixtureCatalog::bundled().unwrap();
        let req = request(&[]);
        let Some(title) = mystery_title(&catalog, req.date) else {
            return;
        };
        let mut out = Vec::new();
        let req = PlayRequest {
            guesses: vec![title.clone()],
            ..req
        };
        let status = play_session(&mut out, catalog, MemoryStorage::new(), &req).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(status, GameStatus::Won);
        assert!(text.contains(&format!("Found \"{title}\" in 1 attempt")));
        assert!(text.contains("Next puzzle in"));
    }
}
