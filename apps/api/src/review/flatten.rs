//! Section Flattener: renders a structured `ResumeDocument` into the same
//! named text blocks the splitter produces for pasted text.

use crate::models::resume::{
    Award, Certification, Education, Language, Project, Publication, ResumeDocument, Skill,
    WorkExperience,
};
use crate::review::sections::FlatSections;

const EM: &str = " — ";
const EN: &str = "–";

/// Renders every section kind. Kinds whose text is blank are left out.
pub fn flatten_document(doc: &ResumeDocument) -> FlatSections {
    let mut flat = FlatSections::new();

    if let Some(summary) = &doc.professional_summary {
        flat.insert("Summary", &summary.content);
    }
    flat.insert("Experience", blocks(&doc.work_experience, render_experience));
    flat.insert("Education", blocks(&doc.education, render_education));
    flat.insert("Skills", render_skills(&doc.skills));
    flat.insert("Projects", blocks(&doc.projects, render_project));
    flat.insert("Certifications", blocks(&doc.certifications, render_certification));
    flat.insert("Publications", blocks(&doc.publications, render_publication));
    flat.insert("Awards", blocks(&doc.awards, render_award));
    flat.insert("Languages", render_languages(&doc.languages));

    flat
}

/// `Title, Company — Location — Start–End` then the description on its own line.
fn render_experience(item: &WorkExperience) -> String {
    let end = if item.current { "Present" } else { item.end_date.as_str() };
    let dates = date_range(&item.start_date, end);
    let header = join_nonempty(&[&item.job_title, &item.company], ", ");
    let tail = join_nonempty(&[&item.location, &dates], EM);
    let line = join_nonempty(&[&header, &tail], EM);
    join_nonempty(&[&line, &item.description], "\n")
}

/// `Degree, Field Institution — Start–End`
fn render_education(item: &Education) -> String {
    let dates = date_range(&item.start_date, &item.end_date);
    let line = join_nonempty(&[&item.degree, &item.field_of_study], ", ");
    let tail = join_nonempty(&[&item.institution, &dates], EM);
    join_nonempty(&[&line, &tail], " ")
}

/// `Go, Rust (Advanced)`; nameless skills are dropped.
fn render_skills(skills: &[Skill]) -> String {
    skills
        .iter()
        .filter(|s| !s.name.trim().is_empty())
        .map(|s| {
            let name = s.name.trim();
            match s.level.trim() {
                "" => name.to_string(),
                level => format!("{name} ({level})"),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Title — Description (Start–End) URL`
fn render_project(item: &Project) -> String {
    let dates = parenthesized(&date_range(&item.start_date, &item.end_date));
    let line = join_nonempty(&[&item.title, &item.description], EM);
    join_nonempty(&[&line, &dates, &item.url], " ")
}

/// `Name — Issuer Issued–Expires`
fn render_certification(item: &Certification) -> String {
    let dates = date_range(&item.issue_date, &item.expiry_date);
    let line = join_nonempty(&[&item.name, &item.issuer], EM);
    join_nonempty(&[&line, &dates], " ")
}

/// `Title — Publisher (Year) URL`; backticks are stripped from the URL.
fn render_publication(item: &Publication) -> String {
    let url = item.url.replace('`', "");
    let year = parenthesized(item.year.trim());
    let line = join_nonempty(&[&item.title, &item.publisher], EM);
    join_nonempty(&[&line, &year, &url], " ")
}

/// `Title — Issuer Year Description`
fn render_award(item: &Award) -> String {
    let line = join_nonempty(&[&item.title, &item.issuer], EM);
    join_nonempty(&[&line, &item.year, &item.description], " ")
}

/// `English — Native, French — B2`; entries with neither field are dropped.
fn render_languages(languages: &[Language]) -> String {
    let entries: Vec<String> = languages
        .iter()
        .map(|l| join_nonempty(&[&l.language, &l.proficiency], EM))
        .filter(|e| !e.is_empty())
        .collect();
    entries.join(", ")
}

/// Renders each entry and joins the non-empty ones with a blank line.
fn blocks<T>(items: &[T], render: fn(&T) -> String) -> String {
    let rendered: Vec<String> = items.iter().map(render).collect();
    let parts: Vec<&str> = rendered.iter().map(String::as_str).collect();
    join_nonempty(&parts, "\n\n")
}

/// Joins the trimmed, non-blank parts with `sep`.
fn join_nonempty(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// `Start–End`, or whichever side is present.
fn date_range(start: &str, end: &str) -> String {
    join_nonempty(&[start, end], EN)
}

fn parenthesized(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("({text})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ProfessionalSummary;

    fn skill(name: &str, level: &str) -> Skill {
        Skill {
            name: name.to_string(),
            level: level.to_string(),
        }
    }

    #[test]
    fn test_skills_render_with_levels() {
        let doc = ResumeDocument {
            skills: vec![skill("Go", ""), skill("Rust", "Advanced")],
            ..Default::default()
        };
        let flat = flatten_document(&doc);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.get("Skills"), Some("Go, Rust (Advanced)"));
    }

    #[test]
    fn test_nameless_skills_dropped() {
        let doc = ResumeDocument {
            skills: vec![skill("", "Expert"), skill("  ", "")],
            ..Default::default()
        };
        assert!(!flatten_document(&doc).contains("Skills"));
    }

    #[test]
    fn test_empty_work_experience_produces_no_key() {
        let doc = ResumeDocument {
            work_experience: vec![],
            ..Default::default()
        };
        let flat = flatten_document(&doc);
        assert!(!flat.contains("Experience"));
        assert!(flat.is_empty());
    }

    #[test]
    fn test_blank_entries_produce_no_key() {
        let doc = ResumeDocument {
            professional_summary: Some(ProfessionalSummary {
                content: "   ".to_string(),
            }),
            work_experience: vec![WorkExperience::default()],
            languages: vec![Language::default()],
            ..Default::default()
        };
        assert!(flatten_document(&doc).is_empty());
    }

    #[test]
    fn test_experience_full_entry() {
        let item = WorkExperience {
            job_title: "Staff Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Berlin".to_string(),
            start_date: "2019".to_string(),
            end_date: "2022".to_string(),
            current: true,
            description: "Led the payments platform.".to_string(),
        };
        assert_eq!(
            render_experience(&item),
            "Staff Engineer, Acme — Berlin — 2019–Present\nLed the payments platform."
        );
    }

    #[test]
    fn test_experience_omits_missing_parts_and_separators() {
        let item = WorkExperience {
            job_title: "Engineer".to_string(),
            end_date: "2020".to_string(),
            ..Default::default()
        };
        assert_eq!(render_experience(&item), "Engineer — 2020");

        let only_desc = WorkExperience {
            description: "Did things".to_string(),
            ..Default::default()
        };
        assert_eq!(render_experience(&only_desc), "Did things");
    }

    #[test]
    fn test_experience_entries_joined_with_blank_line() {
        let doc = ResumeDocument {
            work_experience: vec![
                WorkExperience {
                    company: "A".to_string(),
                    ..Default::default()
                },
                WorkExperience::default(),
                WorkExperience {
                    company: "B".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(flatten_document(&doc).get("Experience"), Some("A\n\nB"));
    }

    #[test]
    fn test_education_line() {
        let item = Education {
            degree: "BSc".to_string(),
            field_of_study: "Computer Science".to_string(),
            institution: "TU Delft".to_string(),
            start_date: "2012".to_string(),
            end_date: "2016".to_string(),
        };
        assert_eq!(render_education(&item), "BSc, Computer Science TU Delft — 2012–2016");
    }

    #[test]
    fn test_project_line() {
        let item = Project {
            title: "rqlite".to_string(),
            description: "Distributed SQLite".to_string(),
            start_date: "2021".to_string(),
            end_date: "".to_string(),
            url: "https://example.com".to_string(),
        };
        assert_eq!(
            render_project(&item),
            "rqlite — Distributed SQLite (2021) https://example.com"
        );
    }

    #[test]
    fn test_certification_line() {
        let item = Certification {
            name: "CKA".to_string(),
            issuer: "CNCF".to_string(),
            issue_date: "2021".to_string(),
            expiry_date: "2024".to_string(),
        };
        assert_eq!(render_certification(&item), "CKA — CNCF 2021–2024");
    }

    #[test]
    fn test_publication_strips_backticks() {
        let item = Publication {
            title: "Fast Joins".to_string(),
            publisher: "VLDB".to_string(),
            year: "2020".to_string(),
            url: " `https://doi.org/x` ".to_string(),
        };
        assert_eq!(render_publication(&item), "Fast Joins — VLDB (2020) https://doi.org/x");
    }

    #[test]
    fn test_award_line() {
        let item = Award {
            title: "Best Paper".to_string(),
            issuer: "ICSE".to_string(),
            year: "2019".to_string(),
            description: "Top of 400 submissions".to_string(),
        };
        assert_eq!(render_award(&item), "Best Paper — ICSE 2019 Top of 400 submissions");
    }

    #[test]
    fn test_languages_line() {
        let langs = vec![
            Language {
                language: "English".to_string(),
                proficiency: "Native".to_string(),
            },
            Language::default(),
            Language {
                language: "".to_string(),
                proficiency: "B2".to_string(),
            },
        ];
        assert_eq!(render_languages(&langs), "English — Native, B2");
    }

    #[test]
    fn test_flatten_order_is_canonical() {
        let doc = ResumeDocument {
            professional_summary: Some(ProfessionalSummary {
                content: "Engineer".to_string(),
            }),
            languages: vec![Language {
                language: "German".to_string(),
                proficiency: String::new(),
            }],
            skills: vec![skill("Rust", "")],
            ..Default::default()
        };
        let flat = flatten_document(&doc);
        assert_eq!(flat.names().collect::<Vec<_>>(), vec!["Summary", "Skills", "Languages"]);
    }
}
