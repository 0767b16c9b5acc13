use axum::response::Html;

use crate::{resumes::repo_types::Resume, users::repo_types::User};

/// Escapes text for use inside element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, msg: Option<&str>, body: &str) -> Html<String> {
    let banner = msg
        .filter(|m| !m.is_empty())
        .map(|m| format!("<p class=\"msg\">{}</p>", escape(m)))
        .unwrap_or_default();
    Html(format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n{banner}\n{body}\n</body>\n</html>\n",
        title = escape(title),
    ))
}

pub fn login(msg: Option<&str>) -> Html<String> {
    layout(
        "Login",
        msg,
        r#"<form method="post" action="/login">
  <input type="email" name="email" placeholder="Email" required>
  <input type="password" name="password" placeholder="Password" required>
  <button type="submit">Log in</button>
</form>
<p><a href="/register">Create an account</a></p>"#,
    )
}

pub fn register(msg: Option<&str>) -> Html<String> {
    layout(
        "Register",
        msg,
        r#"<form method="post" action="/register">
  <input type="text" name="name" placeholder="Name" required>
  <input type="email" name="email" placeholder="Email" required>
  <input type="password" name="password" placeholder="Password" required>
  <button type="submit">Register</button>
</form>
<p><a href="/login">Back to login</a></p>"#,
    )
}

/// Shown when a page cannot be built because the server failed.
pub fn error(message: &str) -> Html<String> {
    layout(
        "Something went wrong",
        Some(message),
        r#"<p><a href="/index">Try again</a></p>"#,
    )
}

fn resume_item(resume: &Resume) -> String {
    let title = escape(&resume.title);
    let description = escape(resume.description.as_deref().unwrap_or(""));
    let id = resume.id;
    format!(
        r#"<li>
  <h3>{title}</h3>
  <p>{description}</p>
  <form method="post" action="/update_resume">
    <input type="hidden" name="resume_id" value="{id}">
    <input type="text" name="title" value="{title}" required>
    <textarea name="description">{description}</textarea>
    <button type="submit">Save</button>
  </form>
  <form method="post" action="/update_resume_partial">
    <input type="hidden" name="resume_id" value="{id}">
    <input type="text" name="title" placeholder="New title">
    <textarea name="description" placeholder="New description"></textarea>
    <button type="submit">Update</button>
  </form>
  <form method="post" action="/improve_resume">
    <input type="hidden" name="resume_id" value="{id}">
    <button type="submit">Improve</button>
  </form>
  <form method="post" action="/delete_resume/{id}">
    <button type="submit">Delete</button>
  </form>
</li>"#
    )
}

pub fn index(user: &User, resumes: &[Resume], msg: Option<&str>) -> Html<String> {
    let items: String = resumes.iter().map(resume_item).collect();
    let body = format!(
        r#"<p>Signed in as {name} ({email})</p>
<form method="post" action="/logout"><button type="submit">Log out</button></form>
<h2>New resume</h2>
<form method="post" action="/create_resume">
  <input type="text" name="title" placeholder="Title" required>
  <textarea name="description" placeholder="Description"></textarea>
  <button type="submit">Create</button>
</form>
<h2>Your resumes</h2>
<ul>
{items}
</ul>"#,
        name = escape(&user.name),
        email = escape(&user.email),
    );
    layout("Resumes", msg, &body)
}
