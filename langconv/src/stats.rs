use josm_i18n::TranslationStats;
use tracing::info;

const BAR_WIDTH: usize = 25;
const EIGHTHS: [&str; 9] = ["", "▏", "▎", "▍", "▌", "▋", "▊", "▉", "█"];

/// Renders the completion of `completed` out of `total` as a fixed-width bar
/// followed by the percentage, e.g. `░██████████▌              ░  42.00 %`.
///
/// Nothing to complete counts as complete.
pub fn progress_bar(completed: usize, total: usize) -> Result<String, String> {
    if completed > total {
        return Err(format!(
            "More items are completed ({completed}) than there are in total ({total})!"
        ));
    }
    // Scaled before dividing, so that e.g. 125 of 10000 hits exactly 2.5 eighths.
    let scaled = |scale: usize| {
        if total == 0 {
            scale as f64
        } else {
            (completed * scale) as f64 / total as f64
        }
    };
    let eighths = scaled(BAR_WIDTH * 8);
    let full_blocks = (eighths / 8.0).floor() as usize;
    let partial = EIGHTHS[((eighths % 8.0).round() as usize).min(8)];
    let bar = format!("{}{partial}", "█".repeat(full_blocks));
    let frame = if completed == total { '▓' } else { '░' };

    let hundredths = scaled(10_000).round() as u64;
    Ok(format!(
        "{frame}{bar:<width$}{frame} {:>3}.{:02} %",
        hundredths / 100,
        hundredths % 100,
        width = BAR_WIDTH
    ))
}

/// One line for the base language, then one line per translated language
/// (most translated first) with its progress bar.
pub fn stats_lines(stats: &TranslationStats) -> Result<Vec<String>, String> {
    let key_width = stats
        .languages
        .iter()
        .map(|it| it.language.chars().count())
        .chain(std::iter::once(stats.base_language.chars().count()))
        .max()
        .unwrap_or(0)
        + 2;
    let number_width = stats
        .languages
        .iter()
        .map(|it| it.translated)
        .chain(std::iter::once(stats.base_messages))
        .map(|n| n.to_string().len())
        .max()
        .unwrap_or(1);

    let mut lines = Vec::with_capacity(stats.languages.len() + 1);
    lines.push(format!(
        "{:>key_width$}: {:>number_width$} strings (base language)",
        stats.base_language, stats.base_messages
    ));
    for language in &stats.languages {
        let bar = progress_bar(language.translated, stats.base_messages)
            .map_err(|e| format!("Invalid statistics for '{}': {e}", language.language))?;
        lines.push(format!(
            "{:>key_width$}: {:>number_width$} strings {bar} translated",
            language.language, language.translated
        ));
    }
    Ok(lines)
}

/// Reports the statistics, as log events or as pretty-printed JSON on stdout.
pub fn print_stats(stats: &TranslationStats, json_output: bool) -> Result<(), String> {
    if json_output {
        let body = serde_json::to_string_pretty(stats)
            .map_err(|e| format!("Error serializing the statistics: {e}"))?;
        println!("{body}");
        return Ok(());
    }
    for line in stats_lines(stats)? {
        info!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use josm_i18n::LanguageStats;

    #[test]
    fn test_progress_bar_empty_and_complete() {
        assert_eq!(
            progress_bar(0, 1).unwrap(),
            "░                         ░   0.00 %"
        );
        let complete = "▓█████████████████████████▓ 100.00 %";
        assert_eq!(progress_bar(0, 0).unwrap(), complete);
        assert_eq!(progress_bar(1, 1).unwrap(), complete);
    }

    #[test]
    fn test_progress_bar_partial_blocks() {
        assert_eq!(
            progress_bar(1, 200).unwrap(),
            "░▏                        ░   0.50 %"
        );
        assert_eq!(
            progress_bar(2, 200).unwrap(),
            "░▎                        ░   1.00 %"
        );
        assert_eq!(
            progress_bar(1249, 100_000).unwrap(),
            "░▎                        ░   1.25 %"
        );
        assert_eq!(
            progress_bar(125, 10_000).unwrap(),
            "░▍                        ░   1.25 %"
        );
        assert_eq!(
            progress_bar(3, 200).unwrap(),
            "░▍                        ░   1.50 %"
        );
        assert_eq!(
            progress_bar(42, 100).unwrap(),
            "░██████████▌              ░  42.00 %"
        );
        assert_eq!(
            progress_bar(2000, 4000).unwrap(),
            "░████████████▌            ░  50.00 %"
        );
    }

    #[test]
    fn test_progress_bar_almost_complete() {
        for completed in 99_995..100_000 {
            assert_eq!(
                progress_bar(completed, 100_000).unwrap(),
                "░█████████████████████████░ 100.00 %"
            );
        }
    }

    #[test]
    fn test_progress_bar_width() {
        for completed in 0..=40 {
            assert_eq!(progress_bar(completed, 40).unwrap().chars().count(), 36);
        }
    }

    #[test]
    fn test_progress_bar_more_completed_than_total() {
        assert!(progress_bar(2, 1).is_err());
    }

    #[test]
    fn test_stats_lines() {
        let stats = TranslationStats {
            base_language: "en".to_string(),
            base_messages: 100,
            languages: vec![
                LanguageStats {
                    language: "de".to_string(),
                    translated: 100,
                },
                LanguageStats {
                    language: "en_GB".to_string(),
                    translated: 42,
                },
            ],
        };
        let lines = stats_lines(&stats).unwrap();
        assert_eq!(
            lines,
            vec![
                "     en: 100 strings (base language)",
                "     de: 100 strings ▓█████████████████████████▓ 100.00 % translated",
                "  en_GB:  42 strings ░██████████▌              ░  42.00 % translated",
            ]
        );
    }

    #[test]
    fn test_stats_lines_inconsistent() {
        let stats = TranslationStats {
            base_language: "en".to_string(),
            base_messages: 1,
            languages: vec![LanguageStats {
                language: "de".to_string(),
                translated: 2,
            }],
        };
        let error = stats_lines(&stats).unwrap_err();
        assert!(error.contains("'de'"));
    }
}
