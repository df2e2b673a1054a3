//! Review document assembly: a tree of titled text blocks rendered to LaTeX
//! and Markdown
//!
//! Consumes only section titles and rendered text plus the bibliography file
//! basename; never looks inside bibliographic records.

use crate::config::Config;

/// One titled block of the review, possibly with nested subsections
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    /// 1 = section, 2 = subsection, 3 = subsubsection, deeper = paragraph
    pub level: usize,
    pub content: String,
    pub subsections: Vec<Section>,
}

impl Section {
    pub fn new(title: impl Into<String>, level: usize) -> Self {
        Self {
            title: title.into(),
            level,
            content: String::new(),
            subsections: Vec::new(),
        }
    }

    pub fn with_content(title: impl Into<String>, level: usize, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(title, level)
        }
    }

    pub fn add_subsection(&mut self, subsection: Section) {
        self.subsections.push(subsection);
    }

    pub fn to_latex(&self) -> String {
        let command = match self.level {
            1 => "section",
            2 => "subsection",
            3 => "subsubsection",
            _ => "paragraph",
        };

        let mut lines = vec![format!("\\{}{{{}}}", command, self.title)];
        if !self.content.is_empty() {
            lines.push(String::new());
            lines.push(self.content.clone());
        }
        for subsection in &self.subsections {
            lines.push(String::new());
            lines.push(subsection.to_latex());
        }
        lines.join("\n")
    }

    pub fn to_markdown(&self) -> String {
        let mut lines = vec![format!("{} {}", "#".repeat(self.level), self.title)];
        if !self.content.is_empty() {
            lines.push(String::new());
            lines.push(self.content.clone());
        }
        for subsection in &self.subsections {
            lines.push(String::new());
            lines.push(subsection.to_markdown());
        }
        lines.join("\n")
    }
}

/// The assembled review document
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub short_title: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub sections: Vec<Section>,
    /// Bibliography file name; the extension is stripped for \bibliography
    pub bibliography_file: String,
    pub document_class: String,
    pub class_options: String,
    pub bibliography_style: String,
}

impl Document {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.review.title.clone(),
            short_title: config.review.short_title.clone(),
            authors: config.review.authors.clone(),
            abstract_text: config.review.abstract_text.clone(),
            sections: Vec::new(),
            bibliography_file: config.outputs.bibliography.clone(),
            document_class: config.latex.document_class.clone(),
            class_options: config.latex.class_options.clone(),
            bibliography_style: config.latex.bibliography_style.clone(),
        }
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn to_latex(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "\\documentclass[{}]{{{}}}",
            self.class_options, self.document_class
        ));
        lines.push(String::new());
        lines.push(format!("\\title{{{}}}", self.title));
        for author in &self.authors {
            lines.push(format!("\\author{{{}}}", author));
        }
        lines.push(String::new());
        lines.push("\\begin{document}".to_string());
        lines.push("\\maketitle".to_string());
        lines.push(String::new());

        if !self.abstract_text.is_empty() {
            lines.push("\\begin{abstract}".to_string());
            lines.push(self.abstract_text.clone());
            lines.push("\\end{abstract}".to_string());
            lines.push(String::new());
        }

        for section in &self.sections {
            lines.push(section.to_latex());
            lines.push(String::new());
        }

        let bib_base = self
            .bibliography_file
            .strip_suffix(".bib")
            .unwrap_or(&self.bibliography_file);
        lines.push(format!("\\bibliographystyle{{{}}}", self.bibliography_style));
        lines.push(format!("\\bibliography{{{}}}", bib_base));
        lines.push(String::new());
        lines.push("\\end{document}".to_string());

        lines.join("\n")
    }

    pub fn to_markdown(&self) -> String {
        let mut lines = vec![format!("# {}", self.title), String::new()];

        if !self.authors.is_empty() {
            lines.push(self.authors.join(", "));
            lines.push(String::new());
        }

        if !self.abstract_text.is_empty() {
            lines.push("## Abstract".to_string());
            lines.push(String::new());
            lines.push(self.abstract_text.clone());
            lines.push(String::new());
        }

        for section in &self.sections {
            lines.push(section.to_markdown());
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        let config = Config::starter();
        let mut doc = Document::from_config(&config);
        let mut intro = Section::with_content("Introduction", 1, "Opening text.");
        intro.add_subsection(Section::with_content("Scope", 2, "What is covered."));
        doc.add_section(intro);
        doc.add_section(Section::new("Conclusions", 1));
        doc
    }

    #[test]
    fn test_section_latex_levels() {
        let mut section = Section::with_content("Top", 1, "Body");
        section.add_subsection(Section::new("Nested", 3));
        let latex = section.to_latex();
        assert!(latex.contains("\\section{Top}"));
        assert!(latex.contains("\\subsubsection{Nested}"));
        assert!(latex.contains("Body"));
    }

    #[test]
    fn test_section_markdown_levels() {
        let mut section = Section::new("Top", 1);
        section.add_subsection(Section::new("Nested", 2));
        let md = section.to_markdown();
        assert!(md.contains("# Top"));
        assert!(md.contains("## Nested"));
    }

    #[test]
    fn test_document_latex() {
        let latex = document().to_latex();
        assert!(latex.starts_with("\\documentclass[11pt]{article}"));
        assert!(latex.contains("\\title{My Literature Review}"));
        assert!(latex.contains("\\begin{abstract}"));
        assert!(latex.contains("\\section{Introduction}"));
        // Bibliography references the basename, not the .bib path
        assert!(latex.contains("\\bibliography{references}"));
        assert!(latex.ends_with("\\end{document}"));
    }

    #[test]
    fn test_document_markdown() {
        let md = document().to_markdown();
        assert!(md.starts_with("# My Literature Review"));
        assert!(md.contains("## Abstract"));
        assert!(md.contains("# Introduction"));
        assert!(md.contains("## Scope"));
    }
}
