use chrono::{Datelike as _, Utc};
use leptos::{
    html::{a, footer, li, p, ul},
    prelude::*,
    svg::{path, svg},
};

const LINKS: [(&str, &str); 2] = [("rss", "/rss"), ("sitemap", "/sitemap.xml")];

fn arrow_icon() -> impl IntoView {
    svg()
        .attr("width", "12")
        .attr("height", "12")
        .attr("viewBox", "0 0 12 12")
        .attr("fill", "none")
        .child(path().attr(
            "d",
            "M2.07102 11.3494L0.963068 10.2415L9.2017 1.98864H2.83807L2.85227 0.454545H11.8438V9.46023H10.2955L10.3097 3.09659L2.07102 11.3494Z",
        ).attr("fill", "currentColor"))
}

pub fn component() -> impl IntoView {
    footer().class("mb-16").child((
        ul().class("flex flex-col mt-8 space-y-2 space-x-0 md:flex-row md:space-y-0 md:space-x-4 font-sm text-neutral-600 dark:text-neutral-300")
            .child(
                LINKS
                    .into_iter()
                    .map(|(label, href)| {
                        li().child(
                            a().class("flex items-center transition-all hover:text-neutral-800 dark:hover:text-neutral-100")
                                .rel("noopener noreferrer")
                                .target("_blank")
                                .href(href)
                                .child((arrow_icon(), p().class("ml-2 h-7").child(label))),
                        )
                    })
                    .collect::<Vec<_>>(),
            ),
        p().class("mt-8 text-neutral-600 dark:text-neutral-300")
            .child(format!("\u{a9} {} MIT Licensed", Utc::now().year())),
    ))
}
