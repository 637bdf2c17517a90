//! Server-rendered HTML for the page surface.
//!
//! Plain string rendering, no styling. Every piece of user-supplied text goes
//! through [`escape`] before it reaches the markup.

use std::fmt::Write;

use axum::http::StatusCode;
use carlot_core::fields::FieldErrors;
use carlot_core::types::DbId;
use carlot_db::models::comment::Comment;
use carlot_db::models::listing::Listing;
use carlot_db::models::user::UserSummary;

/// Escape text for safe inclusion in HTML element content and attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, user: Option<&UserSummary>, body: &str) -> String {
    let nav = match user {
        Some(u) => format!(
            r#"<span>Signed in as {}</span> | <a href="/car/create/">Add a car</a> | <a href="/logout/">Log out</a>"#,
            escape(&u.username)
        ),
        None => r#"<a href="/auth/">Log in or register</a>"#.to_string(),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<nav><a href=\"/\">Home</a> | {nav}</nav>\n<main>\n{body}</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// Listing index.
pub fn home(user: Option<&UserSummary>, listings: &[Listing]) -> String {
    let mut body = String::from("<h1>Cars</h1>\n");
    if listings.is_empty() {
        body.push_str("<p>No cars yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for listing in listings {
            let _ = writeln!(
                body,
                r#"<li><a href="/car/{id}">{title}</a> by {owner}</li>"#,
                id = listing.id,
                title = escape(&listing_title(listing)),
                owner = escape(&listing.owner.username),
            );
        }
        body.push_str("</ul>\n");
    }
    layout("Cars", user, &body)
}

/// Listing detail with comments (newest first) and, for signed-in users,
/// a comment form.
pub fn listing_detail(
    user: Option<&UserSummary>,
    listing: &Listing,
    comments: &[Comment],
    comment_error: Option<&str>,
) -> String {
    let title = listing_title(listing);
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(&title));
    let _ = writeln!(
        body,
        "<p>{}</p>\n<p>Owner: {}</p>\n<p>Added {} · updated {}</p>",
        escape(&listing.description),
        escape(&listing.owner.username),
        listing.created_at.format("%Y-%m-%d %H:%M"),
        listing.updated_at.format("%Y-%m-%d %H:%M"),
    );

    if user.is_some_and(|u| u.id == listing.owner.id) {
        let _ = writeln!(
            body,
            r#"<p><a href="/car/update/{}">Edit or delete</a></p>"#,
            listing.id
        );
    }

    body.push_str("<h2>Comments</h2>\n");
    if comments.is_empty() {
        body.push_str("<p>No comments yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for comment in comments {
            let _ = writeln!(
                body,
                "<li><strong>{}</strong> ({}): {}</li>",
                escape(&comment.author_username),
                comment.created_at.format("%Y-%m-%d %H:%M"),
                escape(&comment.content),
            );
        }
        body.push_str("</ul>\n");
    }

    if user.is_some() {
        if let Some(err) = comment_error {
            let _ = writeln!(body, r#"<p class="error">{}</p>"#, escape(err));
        }
        let _ = writeln!(
            body,
            "<form method=\"post\" action=\"/car/{}\">\n\
             <textarea name=\"content\"></textarea>\n\
             <button type=\"submit\">Comment</button>\n</form>",
            listing.id
        );
    }

    layout(&title, user, &body)
}

/// Which listing form to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFormMode {
    Create,
    Update(DbId),
}

/// Values echoed back into the listing form.
#[derive(Debug, Clone, Default)]
pub struct ListingFormValues {
    pub make: String,
    pub model: String,
    pub year: String,
    pub description: String,
}

impl From<&Listing> for ListingFormValues {
    fn from(listing: &Listing) -> Self {
        Self {
            make: listing.make.clone(),
            model: listing.model.clone(),
            year: listing.year.to_string(),
            description: listing.description.clone(),
        }
    }
}

/// Create or update form with per-field error messages.
pub fn listing_form(
    user: Option<&UserSummary>,
    mode: ListingFormMode,
    values: &ListingFormValues,
    errors: &FieldErrors,
) -> String {
    let (title, action) = match mode {
        ListingFormMode::Create => ("Add a car".to_string(), "/car/create/".to_string()),
        ListingFormMode::Update(id) => ("Edit car".to_string(), format!("/car/update/{id}")),
    };

    let mut body = String::new();
    let _ = writeln!(body, "<h1>{title}</h1>");
    let _ = writeln!(body, r#"<form method="post" action="{action}">"#);
    for (name, label, value) in [
        ("make", "Make", &values.make),
        ("model", "Model", &values.model),
        ("year", "Year", &values.year),
    ] {
        let _ = writeln!(
            body,
            r#"<label>{label} <input type="text" name="{name}" value="{}"></label>"#,
            escape(value)
        );
        field_errors(&mut body, errors, name);
    }
    let _ = writeln!(
        body,
        r#"<label>Description <textarea name="description">{}</textarea></label>"#,
        escape(&values.description)
    );
    field_errors(&mut body, errors, "description");

    match mode {
        ListingFormMode::Create => {
            body.push_str("<button type=\"submit\">Create</button>\n");
        }
        ListingFormMode::Update(_) => {
            body.push_str(
                "<button type=\"submit\" name=\"update\" value=\"1\">Save</button>\n\
                 <button type=\"submit\" name=\"delete\" value=\"1\">Delete</button>\n",
            );
        }
    }
    body.push_str("</form>\n");

    layout(&title, user, &body)
}

fn field_errors(body: &mut String, errors: &FieldErrors, field: &str) {
    for message in errors.get(field) {
        let _ = writeln!(body, r#"<p class="error">{}</p>"#, escape(message));
    }
}

/// Combined login / registration page.
pub fn auth_page(user: Option<&UserSummary>, error: Option<&str>) -> String {
    let mut body = String::from("<h1>Log in</h1>\n");
    if let Some(err) = error {
        let _ = writeln!(body, r#"<p class="error">{}</p>"#, escape(err));
    }
    body.push_str(
        "<form method=\"post\" action=\"/auth/\">\n\
         <input type=\"text\" name=\"username\" placeholder=\"Username\">\n\
         <input type=\"password\" name=\"password\" placeholder=\"Password\">\n\
         <button type=\"submit\" name=\"login\" value=\"1\">Log in</button>\n\
         </form>\n\
         <h1>Register</h1>\n\
         <form method=\"post\" action=\"/auth/\">\n\
         <input type=\"text\" name=\"username\" placeholder=\"Username\">\n\
         <input type=\"password\" name=\"password\" placeholder=\"Password\">\n\
         <input type=\"password\" name=\"password_confirm\" placeholder=\"Confirm password\">\n\
         <button type=\"submit\" name=\"register\" value=\"1\">Register</button>\n\
         </form>\n",
    );
    layout("Log in", user, &body)
}

/// Error page for 403 / 404 / 500 outcomes.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{}</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Back to all cars</a></p>\n",
        escape(title),
        escape(message)
    );
    layout(title, None, &body)
}

fn listing_title(listing: &Listing) -> String {
    format!("{} {} ({})", listing.make, listing.model, listing.year)
}
