use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::movie,
    models::{Candidate, EditForm},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn index_page(movies: &[movie::Model]) -> String {
    page(
        "My Top Movies",
        html! {
            div class="max-w-4xl mx-auto px-6 py-12" {
                div class="flex items-start justify-between gap-6" {
                    div {
                        h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                        p class="mt-2 text-gray-600" { "Ranked by your own ratings." }
                    }
                    a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add Movie" }
                }

                @if movies.is_empty() {
                    div class="mt-10 bg-white shadow rounded-lg p-8" {
                        p class="text-gray-600" { "No movies yet." }
                    }
                } @else {
                    div class="mt-10 space-y-4" {
                        @for movie in movies {
                            (movie_card(movie))
                        }
                    }
                }
            }
        },
    )
}

pub fn add_page(title: &str, error: Option<&str>) -> String {
    page(
        "Add Movie",
        html! {
            (narrow(html! {
                h1 class="text-2xl font-bold text-gray-900" { "Add Movie" }
                (error_list(error.into_iter()))
                form class="mt-8 space-y-6" method="post" action="/add" {
                    div {
                        label class="block text-sm font-medium text-gray-700" for="title" { "Movie Title" }
                        input class=(INPUT_CLASS) name="title" id="title" value=(title) required;
                    }
                    button class=(BUTTON_CLASS) type="submit" { "Add Movie" }
                }
            }))
        },
    )
}

pub fn select_page(query: &str, candidates: &[Candidate]) -> String {
    page(
        "Select Movie",
        html! {
            (narrow(html! {
                h1 class="text-2xl font-bold text-gray-900" { "Select Movie" }
                p class="mt-2 text-gray-600" { "Results for \u{201c}" (query) "\u{201d}" }

                @if candidates.is_empty() {
                    p class="mt-6 text-gray-600" { "No matches found." }
                } @else {
                    ul class="mt-6 divide-y divide-gray-200" {
                        @for c in candidates {
                            li class="py-3" {
                                a class="text-blue-600 hover:text-blue-800" href=(format!("/details,{}", c.id)) {
                                    (c.title)
                                    @if let Some(year) = c.year() {
                                        span class="ml-2 text-gray-500" { "(" (year) ")" }
                                    }
                                }
                                @if let Some(overview) = c.overview.as_deref().filter(|o| !o.is_empty()) {
                                    p class="mt-1 text-sm text-gray-500 line-clamp-2" { (overview) }
                                }
                            }
                        }
                    }
                }
                a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/add" { "New search" }
            }))
        },
    )
}

pub fn edit_page(movie: &movie::Model, form: &EditForm, errors: &[String]) -> String {
    page(
        "Edit Movie",
        html! {
            (narrow(html! {
                h1 class="text-2xl font-bold text-gray-900" { (movie.title) }
                p class="mt-2 text-gray-600" { "Rate and review" }
                (error_list(errors.iter().map(String::as_str)))
                form class="mt-8 space-y-6" method="post" action=(format!("/edit,{}", movie.id)) {
                    div {
                        label class="block text-sm font-medium text-gray-700" for="rating" { "Rating out of 10" }
                        input class=(INPUT_CLASS) name="rating" id="rating" value=(form.rating) inputmode="decimal" required;
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700" for="review" { "Your review" }
                        input class=(INPUT_CLASS) name="review" id="review" value=(form.review) required;
                    }
                    button class=(BUTTON_CLASS) type="submit" { "Done" }
                }
            }))
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        "Error",
        html! {
            (narrow(html! {
                h1 class="text-2xl font-bold text-gray-900" { "Error" }
                p class="mt-1 text-sm text-gray-500" { (status.to_string()) }
                p class="mt-4 text-gray-700" { (message) }
                a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
            }))
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-50" { (body) }
        }
    }
    .into_string()
}

fn narrow(inner: Markup) -> Markup {
    html! {
        div class="max-w-xl mx-auto px-6 py-12" {
            div class="bg-white shadow rounded-lg p-8" { (inner) }
        }
    }
}

fn error_list<'a>(errors: impl Iterator<Item = &'a str>) -> Markup {
    html! {
        @for err in errors {
            p class="mt-4 rounded-md bg-red-50 px-3 py-2 text-sm text-red-700" { (err) }
        }
    }
}

fn movie_card(movie: &movie::Model) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            @if let Some(img) = &movie.img_url {
                img class="w-24 rounded" src=(img) alt=(movie.title);
            }
            div class="flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        @if let Some(rank) = movie.ranking {
                            span class="mr-2 text-gray-400" { "#" (rank) }
                        }
                        (movie.title)
                        @if let Some(year) = movie.year {
                            span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                        }
                    }
                    span class="text-lg font-semibold text-blue-600" { (format_rating(movie.rating)) }
                }
                @if !movie.review.is_empty() {
                    p class="mt-2 italic text-gray-700" { "\u{201c}" (movie.review) "\u{201d}" }
                }
                p class="mt-2 text-sm text-gray-600" { (movie.description) }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/edit,{}", movie.id)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/delete,{}", movie.id)) { "Delete" }
                }
            }
        }
    }
}

fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 { format!("{rating:.0}") } else { format!("{rating:.1}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> movie::Model {
        movie::Model {
            id: 27205,
            title: "Inception".into(),
            year: Some(2010),
            description: "Dreams <within> dreams".into(),
            rating: 9.0,
            ranking: Some(1),
            review: "Great".into(),
            img_url: Some("https://image.tmdb.org/t/p/w500/x.jpg".into()),
        }
    }

    #[test]
    fn index_renders_rank_rating_and_actions() {
        let html = index_page(&[inception()]);
        assert!(html.contains("#1"));
        assert!(html.contains("(2010)"));
        assert!(html.contains("Great"));
        assert!(html.contains("href=\"/edit,27205\""));
        assert!(html.contains("href=\"/delete,27205\""));
        assert!(html.contains("Dreams &lt;within&gt; dreams"));
    }

    #[test]
    fn select_links_to_details() {
        let candidates = vec![Candidate {
            id: 27205,
            title: "Inception".into(),
            release_date: Some("2010-07-16".into()),
            overview: None,
        }];
        let html = select_page("Inception", &candidates);
        assert!(html.contains("href=\"/details,27205\""));
        assert!(html.contains("(2010)"));
    }

    #[test]
    fn ratings_drop_needless_decimals() {
        assert_eq!(format_rating(9.0), "9");
        assert_eq!(format_rating(7.26), "7.3");
        assert_eq!(format_rating(6.5), "6.5");
    }
}
