// Example runner: turns one image into a puzzle image plus an answer key.
//
//   spot_diff <input> <output>
//
// SPOT_DIFF_COUNT, SPOT_DIFF_DIFFICULTY and SPOT_DIFF_SEED override the defaults
// (5 differences, difficulty 1, random seed). RUST_LOG controls verbosity.

use anyhow::{Context, bail};
use spot_diff::annotate::draw_answer_key;
use spot_diff::{DiffSession, EngineConfig, NoDetections};
use std::path::PathBuf;
use std::str::FromStr;

fn env_setting<T: FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{name} has an invalid value: {value:?}")),
        _ => Ok(None),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        bail!("usage: spot_diff <input> <output>");
    };
    let output = PathBuf::from(output);

    let count = env_setting::<i32>("SPOT_DIFF_COUNT")?.unwrap_or(5);
    let difficulty = env_setting::<i32>("SPOT_DIFF_DIFFICULTY")?.unwrap_or(1);
    let seed = env_setting::<u64>("SPOT_DIFF_SEED")?;

    let source = image::open(&input).with_context(|| format!("failed to open {input}"))?;

    let mut session = DiffSession::new(
        NoDetections,
        EngineConfig {
            seed,
            ..EngineConfig::default()
        },
    );
    session.set_diff_count(count);
    session.set_difficulty(difficulty);
    log::info!(
        "{}: {}x{}, {} differences at difficulty {}",
        input,
        source.width(),
        source.height(),
        session.diff_count(),
        session.difficulty()
    );

    let puzzle = session
        .generate_diff_image(&source)
        .context("difference synthesis failed")?;
    puzzle
        .save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    for (i, record) in session.diff_data().iter().enumerate() {
        log::info!(
            "#{} {} at ({:.1}, {:.1}), size {:.1}",
            i + 1,
            record.algorithm.name(),
            record.position.x,
            record.position.y,
            record.size
        );
    }

    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string();
    let key_path = output.with_file_name(format!("{stem}_key.png"));
    let mut key = puzzle.to_rgb8();
    draw_answer_key(&mut key, session.diff_data());
    key.save(&key_path)
        .with_context(|| format!("failed to write {}", key_path.display()))?;
    log::info!("answer key written to {}", key_path.display());

    #[cfg(feature = "serde")]
    {
        let json_path = output.with_file_name(format!("{stem}.json"));
        let json = serde_json::to_string_pretty(session.diff_data()).context("failed to encode records")?;
        std::fs::write(&json_path, json).with_context(|| format!("failed to write {}", json_path.display()))?;
        log::info!("records written to {}", json_path.display());
    }

    Ok(())
}
