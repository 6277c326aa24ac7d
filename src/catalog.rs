use crate::usage::{UsageCounts, usage_of};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
    pub id: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
}

pub const TOOLS: &[Tool] = &[
    Tool {
        id: "merge",
        name: "Merge PDF",
        summary: "Combine several PDFs into one document",
    },
    Tool {
        id: "split",
        name: "Split PDF",
        summary: "Extract page ranges into separate files",
    },
    Tool {
        id: "compress",
        name: "Compress PDF",
        summary: "Shrink file size while keeping quality",
    },
    Tool {
        id: "rotate",
        name: "Rotate PDF",
        summary: "Turn pages to the right orientation",
    },
    Tool {
        id: "pdf-to-image",
        name: "PDF to Image",
        summary: "Render pages as PNG or JPEG",
    },
    Tool {
        id: "image-to-pdf",
        name: "Image to PDF",
        summary: "Bundle images into a single PDF",
    },
    Tool {
        id: "watermark",
        name: "Watermark",
        summary: "Stamp text over every page",
    },
    Tool {
        id: "page-numbers",
        name: "Page Numbers",
        summary: "Add page numbers to the footer",
    },
];

pub fn find_tool(id: &str) -> Option<&'static Tool> {
    TOOLS.iter().find(|tool| tool.id == id)
}

/// Tools ordered by usage, most used first; ties keep catalog order.
pub fn by_popularity(counts: &UsageCounts) -> Vec<&'static Tool> {
    let mut tools: Vec<&'static Tool> = TOOLS.iter().collect();
    tools.sort_by_key(|tool| std::cmp::Reverse(usage_of(counts, tool.id)));
    tools
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    Tool(String),
    About,
    Privacy,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Tool(_) => "tool",
            View::About => "about",
            View::Privacy => "privacy",
        }
    }

    pub fn title(&self) -> String {
        match self {
            View::Home => "PDF Tools".to_string(),
            View::Tool(id) => find_tool(id)
                .map(|tool| tool.name.to_string())
                .unwrap_or_else(|| id.clone()),
            View::About => "About".to_string(),
            View::Privacy => "Privacy".to_string(),
        }
    }
}
