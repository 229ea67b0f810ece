//! HTML rendering with embedded minijinja templates.

use minijinja::{context, default_auto_escape_callback, Environment, Value};
use serde::Serialize;

use notehub_core::{defaults, NoteTag, NotesPage, PageMetadata, TagFilter};
use notehub_query::DehydratedState;

use crate::note_form::NoteForm;

/// Id of the `<script>` element carrying the dehydrated cache.
pub const STATE_SCRIPT_ID: &str = "notehub-state";

pub struct Templates {
    env: Environment<'static>,
}

#[derive(Serialize)]
struct TagLink {
    label: &'static str,
    href: String,
    active: bool,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.add_template("layout.html", include_str!("templates/layout.html"))?;
        env.add_template("filter_page.html", include_str!("templates/filter_page.html"))?;
        env.add_template("note_form.html", include_str!("templates/note_form.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, name: &str, ctx: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    /// The notes list page, with the cache snapshot embedded for hydration.
    pub fn filter_page(
        &self,
        meta: &PageMetadata,
        filter: TagFilter,
        page: &NotesPage,
        state: &DehydratedState,
    ) -> Result<String, minijinja::Error> {
        let state_json = state_script_json(state).map_err(|e| {
            minijinja::Error::new(minijinja::ErrorKind::BadSerialization, e.to_string())
        })?;

        self.render(
            "filter_page.html",
            context! {
                meta => meta,
                site_name => defaults::SITE_NAME,
                tags => tag_links(filter),
                notes => page.notes,
                total_pages => page.total_pages,
                state_id => STATE_SCRIPT_ID,
                state_json => Value::from_safe_string(state_json),
            },
        )
    }

    /// The create form with its current values and field errors.
    pub fn note_form(&self, form: &NoteForm) -> Result<String, minijinja::Error> {
        let meta = PageMetadata {
            title: format!("Create note — {}", defaults::SITE_NAME),
            description: "Create a new note in NoteHub.".to_string(),
        };
        let tags: Vec<&str> = NoteTag::ALL.iter().map(|t| t.as_str()).collect();

        self.render(
            "note_form.html",
            context! {
                meta => meta,
                site_name => defaults::SITE_NAME,
                mode => form.mode().as_str(),
                values => form.values(),
                errors => form.errors(),
                tags => tags,
                submit_disabled => !form.can_submit(),
            },
        )
    }
}

fn tag_links(filter: TagFilter) -> Vec<TagLink> {
    let all = TagLink {
        label: defaults::ALL_SEGMENT,
        href: format!("/notes/filter/{}", defaults::ALL_SEGMENT),
        active: filter == TagFilter::NoFilter,
    };
    std::iter::once(all)
        .chain(NoteTag::ALL.iter().map(|tag| TagLink {
            label: tag.as_str(),
            href: format!("/notes/filter/{}", tag),
            active: filter == TagFilter::Tag(*tag),
        }))
        .collect()
}

/// Serialize a cache snapshot for a `<script type="application/json">` body.
/// `<` is escaped so the payload cannot close the element.
pub fn state_script_json(state: &DehydratedState) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(state)?.replace('<', "\\u003c"))
}

/// Pull the cache snapshot back out of a rendered page.
pub fn extract_state(html: &str) -> Option<DehydratedState> {
    let marker = format!("id=\"{}\">", STATE_SCRIPT_ID);
    let start = html.find(&marker)? + marker.len();
    let end = start + html[start..].find("</script>")?;
    serde_json::from_str(&html[start..end]).ok()
}
