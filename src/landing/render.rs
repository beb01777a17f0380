// src/landing/render.rs
//! Server-side HTML for the landing page. Every literal goes through html-escape.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use super::content::{
    NavLink, CONTACT, FOOTER_LINKS, FOOTER_NOTE, HERO, INVESTMENT, JOIN_LABEL, NAV_LINKS,
    PRINCIPLES, PRINCIPLES_HEADING, PRINCIPLES_LEAD, PROJECTS, PROJECTS_HEADING, PROJECTS_LEAD,
    PROJECTS_TAGLINE, TEAM, TEAM_HEADING, TEAM_LEAD, TELEGRAM_URL, BRAND, BRAND_SUFFIX,
};
use super::MenuState;

const STYLE: &str = "body{margin:0;font-family:Inter,system-ui,sans-serif;background:#111827;color:#e5e7eb}\
header{position:sticky;top:0;background:rgba(17,24,39,.8);border-bottom:1px solid #374151}\
section{padding:4rem 2rem}.card{border:1px solid #374151;border-radius:1rem;padding:1.5rem;margin:1rem 0}\
.badge{display:inline-block;border:1px solid #4b5563;border-radius:999px;padding:.1rem .6rem;margin:.2rem}\
a{color:#60a5fa}";

/// Render the whole landing page for the given menu state.
pub fn render_page(menu: MenuState) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"ru\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(out, "<title>{} {}</title>", text(BRAND), text(BRAND_SUFFIX));
    let _ = writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>");

    header(&mut out, menu);
    hero(&mut out);
    projects(&mut out);
    principles(&mut out);
    team(&mut out);
    investment(&mut out);
    contact(&mut out);
    footer(&mut out);

    out.push_str("</body>\n</html>\n");
    out
}

fn external_link(out: &mut String, href: &str, label: &str) {
    let _ = write!(
        out,
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        attr(href),
        text(label)
    );
}

fn nav(out: &mut String, links: &[NavLink], class: &str) {
    let _ = write!(out, "<nav class=\"{}\">", attr(class));
    for l in links {
        let _ = write!(out, "<a href=\"{}\">{}</a> ", attr(l.href), text(l.label));
    }
    external_link(out, TELEGRAM_URL, JOIN_LABEL);
    out.push_str("</nav>\n");
}

fn header(out: &mut String, menu: MenuState) {
    let _ = write!(
        out,
        "<header data-menu=\"{}\">\n<h1>{} <span>{}</span></h1>\n",
        menu.as_str(),
        text(BRAND),
        text(BRAND_SUFFIX)
    );
    nav(out, &NAV_LINKS, "desktop");

    // The toggle re-renders the page with the flipped state.
    let (icon, label) = if menu.is_open() {
        ("✕", "Закрыть меню")
    } else {
        ("☰", "Открыть меню")
    };
    let _ = writeln!(
        out,
        "<a class=\"menu-toggle\" href=\"/?menu={}\" aria-label=\"{}\" aria-expanded=\"{}\">{}</a>",
        menu.toggled().as_str(),
        attr(label),
        menu.is_open(),
        icon
    );
    if menu.is_open() {
        nav(out, &NAV_LINKS, "mobile");
    }
    out.push_str("</header>\n");
}

fn hero(out: &mut String) {
    out.push_str("<section id=\"hero\">\n");
    let _ = writeln!(out, "<span class=\"badge\">{}</span>", text(HERO.badge));
    let _ = writeln!(out, "<h2>{}</h2>", text(HERO.title));
    let [tech, business, growth] = HERO.highlights;
    let _ = writeln!(
        out,
        "<p>{} <strong>{}</strong>, <strong>{}</strong> и <strong>{}</strong></p>",
        text(HERO.lead),
        text(tech),
        text(business),
        text(growth)
    );
    out.push_str("<p>");
    external_link(out, TELEGRAM_URL, HERO.primary_cta);
    out.push(' ');
    external_link(out, TELEGRAM_URL, HERO.secondary_cta);
    out.push_str("</p>\n<p>");
    for tag in HERO.tags {
        let _ = write!(out, "<span class=\"badge\">{}</span>", text(tag));
    }
    out.push_str("</p>\n</section>\n");
}

fn projects(out: &mut String) {
    out.push_str("<section id=\"projects\">\n");
    let _ = writeln!(out, "<h2>{}</h2>", text(PROJECTS_HEADING));
    let _ = writeln!(out, "<p>{}</p>", text(PROJECTS_LEAD));
    let _ = writeln!(out, "<p>{}</p>", text(PROJECTS_TAGLINE));

    for p in &PROJECTS {
        out.push_str("<article class=\"card project\">\n");
        let _ = writeln!(out, "<h3>{}</h3>", text(p.title));
        let _ = writeln!(out, "<p class=\"subtitle\">{}</p>", text(p.subtitle));
        let _ = writeln!(out, "<p>{}</p>", text(p.description));
        let _ = writeln!(out, "<p><b>Миссия проекта:</b> {}</p>", text(p.mission));
        out.push_str("<p>Открытые позиции для талантов:</p>\n<ul>\n");
        for partner in p.partners {
            let _ = write!(out, "<li><h4>{}</h4>", text(partner.role));
            if !partner.level.is_empty() {
                let _ = write!(out, "<span class=\"badge\">{}</span>", text(partner.level));
            }
            let _ = writeln!(out, "<p>{}</p></li>", text(partner.description));
        }
        out.push_str("</ul>\n");
        if let (Some(href), Some(url)) = (p.href(), p.url) {
            out.push_str("<p>");
            external_link(out, &href, &format!("🔗 Перейти к проекту: {url}"));
            out.push_str("</p>\n");
        }
        out.push_str("<p>");
        external_link(out, TELEGRAM_URL, "Обсудить участие");
        out.push_str("</p>\n</article>\n");
    }
    out.push_str("</section>\n");
}

fn principles(out: &mut String) {
    out.push_str("<section id=\"principles\">\n");
    let _ = writeln!(out, "<h2>{}</h2>", text(PRINCIPLES_HEADING));
    let _ = writeln!(out, "<p>{}</p>", text(PRINCIPLES_LEAD));
    // Two rows of three.
    for row in PRINCIPLES.chunks(3) {
        out.push_str("<div class=\"row\">\n");
        for p in row {
            let _ = writeln!(
                out,
                "<div class=\"card principle\"><h3>{}</h3><p>{}</p></div>",
                text(p.title),
                text(p.description)
            );
        }
        out.push_str("</div>\n");
    }
    out.push_str("</section>\n");
}

fn team(out: &mut String) {
    out.push_str("<section id=\"team\">\n");
    let _ = writeln!(out, "<h2>{}</h2>", text(TEAM_HEADING));
    let _ = writeln!(out, "<p>{}</p>", text(TEAM_LEAD));
    for m in &TEAM {
        out.push_str("<div class=\"card member\">\n");
        let _ = writeln!(out, "<span class=\"avatar\">{}</span>", text(m.initials));
        let _ = writeln!(out, "<h3>{}</h3>", text(m.name));
        let _ = writeln!(out, "<p class=\"role\">{}</p>", text(m.role));
        let _ = writeln!(out, "<p>{}</p>", text(m.bio));
        external_link(out, m.telegram, "Telegram");
        out.push_str("\n</div>\n");
    }
    out.push_str("</section>\n");
}

fn investment(out: &mut String) {
    out.push_str("<section id=\"investment\">\n");
    let _ = writeln!(out, "<h2>{}</h2>", text(INVESTMENT.heading));
    let _ = writeln!(
        out,
        "<div class=\"card\"><h3>{}</h3><h3>{}</h3><p>{}</p>",
        text(INVESTMENT.amount),
        text(INVESTMENT.instrument),
        text(INVESTMENT.purpose)
    );
    for perk in INVESTMENT.perks {
        let _ = write!(out, "<span class=\"badge\">{}</span>", text(perk));
    }
    out.push_str("<p>");
    external_link(out, TELEGRAM_URL, INVESTMENT.cta);
    out.push_str("</p></div>\n</section>\n");
}

fn contact(out: &mut String) {
    out.push_str("<section id=\"join\">\n");
    let _ = writeln!(out, "<h2>{}</h2>", text(CONTACT.heading));
    let _ = writeln!(out, "<p>{}</p>\n<p>", text(CONTACT.lead));
    for role in CONTACT.roles {
        let _ = write!(out, "<span class=\"badge\">{}</span>", text(role));
    }
    out.push_str("</p>\n<p>");
    external_link(out, TELEGRAM_URL, CONTACT.cta);
    out.push_str("</p>\n</section>\n");
}

fn footer(out: &mut String) {
    out.push_str("<footer>\n");
    let _ = writeln!(out, "<p>{}</p>", text(FOOTER_NOTE));
    for l in &FOOTER_LINKS {
        if l.href.starts_with("http") {
            external_link(out, l.href, l.label);
        } else {
            let _ = write!(out, "<a href=\"{}\">{}</a>", attr(l.href), text(l.label));
        }
        out.push(' ');
    }
    out.push_str("\n</footer>\n");
}
