use handlebars::Handlebars;
use serde_json::json;

use crate::error::PanelError;
use crate::render::{FileRow, PrimaryRow, SortRow};

const PRIMARY_ITEM: &str = r#"<div class="primary-item"><span class="primary-name">{{icon}} {{name}}</span><span class="primary-count">{{count}}</span></div>"#;

const SORT_ITEM: &str = r#"<div class="sort-item"><span class="sort-name">{{name}}</span><span class="sort-count">{{count}}</span></div>"#;

const FILE_ITEM: &str = r#"<div class="file-item"><span>{{icon}} {{name}}</span>{{#if lines}}<span class="file-lines">{{lines}}</span>{{/if}}<a href="{{href}}" class="btn-download" download>Télécharger</a></div>"#;

/// Handlebars registry holding the list row fragments
///
/// Every value is HTML-escaped on the way in, so group and file names
/// coming from the workbook cannot inject markup.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, PanelError> {
        let mut registry = Handlebars::new();
        registry.register_template_string("primary_item", PRIMARY_ITEM)?;
        registry.register_template_string("sort_item", SORT_ITEM)?;
        registry.register_template_string("file_item", FILE_ITEM)?;
        Ok(Self { registry })
    }

    pub fn primary_list(&self, rows: &[PrimaryRow]) -> Result<String, PanelError> {
        let mut html = String::new();
        for row in rows {
            html.push_str(&self.registry.render(
                "primary_item",
                &json!({
                    "icon": row.icon,
                    "name": row.name,
                    "count": row.count.text(),
                }),
            )?);
        }
        Ok(html)
    }

    pub fn sort_list(&self, rows: &[SortRow]) -> Result<String, PanelError> {
        let mut html = String::new();
        for row in rows {
            html.push_str(&self.registry.render(
                "sort_item",
                &json!({
                    "name": row.name,
                    "count": row.count_text(),
                }),
            )?);
        }
        Ok(html)
    }

    pub fn file_list(&self, rows: &[FileRow]) -> Result<String, PanelError> {
        let mut html = String::new();
        for row in rows {
            html.push_str(&self.registry.render(
                "file_item",
                &json!({
                    "icon": row.icon,
                    "name": row.name,
                    "lines": row.lines_text(),
                    "href": row.href,
                }),
            )?);
        }
        Ok(html)
    }
}
