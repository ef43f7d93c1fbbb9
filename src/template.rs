//! Widget markup
//!
//! Produces the HTML handed to the mount surface. Class names are the styling
//! contract with the stylesheet shipped alongside the widget:
//!
//! - root `.heart-containers`, plus `.active` while expanded
//! - `button[data-action='toggle']` collapses and expands the row
//! - `.heart.yellow|.red|.neutral`, with `.empty` for a hollow icon and
//!   `.pulse` on the partially filled heart
//! - `.heart.temp` for temporary hit point icons

use std::fmt::Write;

use crate::app::RenderData;
use crate::consts::ELEMENT_ID;
use crate::hearts::Heart;

/// Escape text for use in attribute values and element content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn heart_classes(heart: &Heart) -> String {
    let mut classes = format!("heart {}", heart.tier().as_str());
    if heart.is_empty {
        classes.push_str(" empty");
    }
    if heart.pulse {
        classes.push_str(" pulse");
    }
    classes
}

/// Render markup for the widget root
pub fn render(data: &RenderData) -> String {
    let RenderData::Hearts {
        row,
        active,
        icon,
    } = data
    else {
        return format!(r#"<div id="{ELEMENT_ID}" class="heart-containers no-actor"></div>"#);
    };

    let icon = escape(icon);
    let mut html = String::new();

    // Writing to a String cannot fail
    let _ = write!(
        html,
        r#"<div id="{ELEMENT_ID}" class="heart-containers{}">"#,
        if *active { " active" } else { "" }
    );
    let _ = write!(
        html,
        r#"<button type="button" class="toggle{}" data-action="toggle"><i class="fa-solid {icon}"></i></button>"#,
        if *active { " active" } else { "" }
    );

    html.push_str(r#"<ol class="hearts">"#);
    for heart in &row.hearts {
        let weight = if heart.is_empty { "fa-regular" } else { "fa-solid" };
        let _ = write!(
            html,
            r#"<li class="{}"><i class="{weight} {icon}"></i></li>"#,
            heart_classes(heart)
        );
    }
    html.push_str("</ol>");

    if !row.temp_hearts.is_empty() {
        html.push_str(r#"<ol class="temp-hearts">"#);
        for _ in &row.temp_hearts {
            let _ = write!(html, r#"<li class="heart temp"><i class="fa-solid {icon}"></i></li>"#);
        }
        html.push_str("</ol>");
    }

    html.push_str("</div>");
    html
}
