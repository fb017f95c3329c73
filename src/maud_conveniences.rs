use maud::{Markup, Render, html};

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-4xl font-bold text-gray-800 mb-8" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-3xl font-semibold mb-6" {(s)}
    }
}

pub const INPUT_CLASSES: &str = "p-3 border border-gray-300 rounded-lg text-sm shadow-sm focus:outline-none focus:ring-2 focus:ring-blue-500";

pub fn form_element(id: &'static str, label: &'static str, element: Markup) -> Markup {
    html! {
        div class="flex flex-col" {
            label for=(id) class="text-sm font-medium text-gray-700 mb-2" {(label)}
            (element)
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    ty: Option<&'static str>,
    placeholder: Option<&'static str>,
    value: &str,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input required type=(ty.unwrap_or("text")) id=(id) name=(id) placeholder=[placeholder] value=(value) class=(INPUT_CLASSES);
        },
    )
}

pub fn render_table<const N: usize>(titles: [&'static str; N], items: Vec<[Markup; N]>) -> Markup {
    html! {
        table class="w-full table-auto border-collapse bg-white shadow-md rounded-lg" {
            thead {
                tr class="bg-gray-200" {
                    @for title in titles {
                        th class="p-3 border-b text-left" {(title)}
                    }
                }
            }
            tbody {
                @for row in items {
                    tr class="hover:bg-gray-50 transition duration-300" {
                        @for col in row {
                            td class="p-3 border-b text-left" {(col)}
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// What the page shows in place of a browser `alert`.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub details: Vec<&'static str>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            details: vec![],
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
            details: vec![],
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Iterator<Item = &'static str>) -> Self {
        self.details.extend(details);
        self
    }
}

impl Render for Notice {
    fn render(&self) -> Markup {
        let colours = match self.kind {
            NoticeKind::Success => "bg-green-100 border-green-400 text-green-700",
            NoticeKind::Failure => "bg-red-100 border-red-400 text-red-700",
        };

        html! {
            div class={"border px-4 py-3 rounded relative mb-4 " (colours)} role="alert" {
                span {(self.message)}
                @if !self.details.is_empty() {
                    ul class="list-disc list-inside" {
                        @for detail in &self.details {
                            li {(detail)}
                        }
                    }
                }
            }
        }
    }
}

/// The notices area, swapped out-of-band so any response can raise one.
pub fn notices_oob(notice: Option<&Notice>) -> Markup {
    html! {
        div id="notices" hx-swap-oob="true" class="w-full max-w-5xl" {
            @if let Some(notice) = notice {
                (notice)
            }
        }
    }
}
