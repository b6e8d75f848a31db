use crate::data::{ResolvedFile, TaskMetadata};

/// Builds the human-readable report for one extraction run.
///
/// Output is deterministic for a given input and safe for an empty list.
pub fn summarize(files: &[ResolvedFile], meta: &TaskMetadata) -> String {
    let mut languages: Vec<&str> = Vec::new();
    for file in files {
        if !languages.contains(&file.language.as_str()) {
            languages.push(&file.language);
        }
    }

    let areas = if meta.affected_areas.is_empty() {
        "général".to_string()
    } else {
        meta.affected_areas
            .iter()
            .map(|area| area.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut summary = format!("✅ {} fichier(s) généré(s)\n", files.len());
    summary.push_str(&format!("🔧 Langages: {}\n", languages.join(", ")));
    summary.push_str(&format!("📁 Zones: {}\n", areas));
    summary.push_str(&format!("📋 Type: {}\n\n", meta.task_type));

    summary.push_str("Fichiers créés:\n");
    for file in files {
        summary.push_str(&format!("- {} ({})\n", file.path, file.language));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AffectedArea, TaskType};

    fn file(path: &str, language: &str) -> ResolvedFile {
        ResolvedFile {
            path: path.to_string(),
            content: "x".to_string(),
            language: language.to_string(),
            original_name: path.to_string(),
        }
    }

    #[test]
    fn test_summary_layout() {
        let files = vec![
            file("src/components/Hero.jsx", "javascript"),
            file("src/styles/hero.css", "css"),
            file("src/components/Nav.jsx", "javascript"),
        ];
        let meta = TaskMetadata::new(
            TaskType::Frontend,
            vec![AffectedArea::Frontend, AffectedArea::Testing],
        );

        let expected = "✅ 3 fichier(s) généré(s)\n\
                        🔧 Langages: javascript, css\n\
                        📁 Zones: frontend, testing\n\
                        📋 Type: frontend\n\
                        \n\
                        Fichiers créés:\n\
                        - src/components/Hero.jsx (javascript)\n\
                        - src/styles/hero.css (css)\n\
                        - src/components/Nav.jsx (javascript)\n";
        assert_eq!(summarize(&files, &meta), expected);
    }

    #[test]
    fn test_empty_run() {
        let summary = summarize(&[], &TaskMetadata::default());
        assert_eq!(
            summary,
            "✅ 0 fichier(s) généré(s)\n🔧 Langages: \n📁 Zones: général\n📋 Type: feature\n\nFichiers créés:\n"
        );
    }

    #[test]
    fn test_summary_is_deterministic() {
        let files = vec![file("a.py", "python"), file("b.go", "go")];
        let meta = TaskMetadata::new(TaskType::BugFix, vec![]);
        assert_eq!(summarize(&files, &meta), summarize(&files, &meta));
        assert!(summarize(&files, &meta).contains("📋 Type: bug_fix\n"));
    }
}
