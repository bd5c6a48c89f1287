// SPDX-License-Identifier: Apache-2.0

use crate::http::handlers_utilities::run_blocking;
use crate::http::request_tracing::RequestTrace;
use crate::http::response_contract::finish;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::{Html, Response};
use axum::Extension;
use bijux_labeler_api::{parse_name, ApiError};
use bijux_labeler_model::{
    image_path, ImageRef, LabelName, LabelSummary, ProjectName, Thumbnail,
};
use std::fmt::Write as _;
use tracing::warn;

#[must_use]
pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `/images` URL for a stored image, each path segment percent-encoded.
fn image_src(project: &ProjectName, label: &LabelName, image: &str) -> String {
    format!(
        "/images?path=projects/{}/{}/{}",
        urlencoding::encode(project.as_str()),
        urlencoding::encode(label.as_str()),
        urlencoding::encode(image)
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>{body}</body></html>",
        escape_html(title)
    )
}

#[must_use]
pub(crate) fn render_index(projects: &[(ProjectName, Option<Thumbnail>)]) -> String {
    let mut list = String::new();
    for (project, thumbnail) in projects {
        let name = escape_html(project.as_str());
        let _ = write!(
            list,
            "<li class=\"project\" data-project=\"{name}\"><a href=\"/project/{}\">",
            urlencoding::encode(project.as_str())
        );
        if let Some(thumb) = thumbnail {
            let _ = write!(
                list,
                "<img class=\"thumbnail\" src=\"{}\" alt=\"{name}\">",
                escape_html(&image_src(project, &thumb.label, thumb.image.as_str()))
            );
        }
        let _ = write!(list, "<span>{name}</span></a></li>");
    }
    if list.is_empty() {
        list.push_str("<li>No projects yet.</li>");
    }
    page(
        "Projects",
        &format!("<h1>Projects</h1><ul id=\"projects\">{list}</ul>"),
    )
}

#[must_use]
pub(crate) fn render_project(
    project: &ProjectName,
    labels: &[LabelSummary],
    images: &[ImageRef],
) -> String {
    let name = escape_html(project.as_str());
    let mut label_list = String::new();
    for label in labels {
        let label_name = escape_html(label.name.as_str());
        let _ = write!(
            label_list,
            "<li class=\"label\" data-label=\"{label_name}\">{label_name} <span class=\"count\">({})</span></li>",
            label.count
        );
    }
    let mut grid = String::new();
    for image in images {
        let label_name = escape_html(image.label.as_str());
        let image_name = escape_html(image.name.as_str());
        let _ = write!(
            grid,
            "<figure class=\"image\" data-label=\"{label_name}\" data-image=\"{image_name}\" data-path=\"{}\">\
<img src=\"{}\" alt=\"{image_name}\"><figcaption>{image_name}</figcaption></figure>",
            escape_html(&image_path(project, &image.label, &image.name)),
            escape_html(&image_src(project, &image.label, image.name.as_str()))
        );
    }
    page(
        project.as_str(),
        &format!(
            "<h1 data-project=\"{name}\">{name}</h1><p><a href=\"/\">All projects</a></p>\
<h2>Labels</h2><ul id=\"labels\">{label_list}</ul>\
<h2>Images</h2><div id=\"images\">{grid}</div>"
        ),
    )
}

pub(crate) async fn index_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
) -> Response {
    let store = state.store.clone();
    let result = run_blocking("render_index", move || {
        let mut rows = Vec::new();
        for project in store.list_projects()? {
            // A project without a usable thumbnail is still listed.
            let thumbnail = store.select_thumbnail(&project).unwrap_or_else(|e| {
                warn!(project = %project, error = %e, "thumbnail unavailable");
                None
            });
            rows.push((project, thumbnail));
        }
        Ok(rows)
    })
    .await
    .map(|rows| Html(render_index(&rows)));
    finish(&trace, result)
}

pub(crate) async fn project_page_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    Path(raw_project): Path<String>,
) -> Response {
    let result = async move {
        let project: ProjectName = parse_name("projectName", &raw_project)?;
        let store = state.store.clone();
        let page_project = project.clone();
        let (labels, images) = run_blocking("render_project", move || {
            Ok((store.list_labels(&project)?, store.list_images(&project)?))
        })
        .await?;
        Ok::<_, ApiError>(Html(render_project(&page_project, &labels, &images)))
    }
    .await;
    finish(&trace, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bijux_labeler_model::ImageName;

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(
            escape_html("<a href=\"x\">&'"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn project_page_escapes_names_and_encodes_urls() {
        let project = ProjectName::new("a<b>").expect("project");
        let label = LabelName::new("c d").expect("label");
        let labels = vec![LabelSummary {
            name: label.clone(),
            count: 1,
        }];
        let images = vec![ImageRef::new(label, ImageName::new("x&y.png").expect("image"))];
        let html = render_project(&project, &labels, &images);
        assert!(html.contains("<h1 data-project=\"a&lt;b&gt;\">a&lt;b&gt;</h1>"));
        assert!(html.contains("/images?path=projects/a%3Cb%3E/c%20d/x%26y.png"));
        assert!(html.contains("c d <span class=\"count\">(1)</span>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn index_lists_projects_with_thumbnails() {
        let cats = ProjectName::new("cats").expect("project");
        let dogs = ProjectName::new("dogs").expect("project");
        let thumb = Thumbnail {
            label: LabelName::new("tabby").expect("label"),
            image: ImageName::new("1.png").expect("image"),
        };
        let html = render_index(&[(cats, Some(thumb)), (dogs, None)]);
        assert!(html.contains("href=\"/project/cats\""));
        assert!(html.contains("src=\"/images?path=projects/cats/tabby/1.png\""));
        assert!(html.contains("<span>dogs</span>"));
        assert!(render_index(&[]).contains("No projects yet."));
    }
}
