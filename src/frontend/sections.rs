use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Math;
use web_sys::{window, CustomEvent};
use yew::prelude::*;

use super::dom::{prefers_reduced_motion, scroll_to_id, set_timeout_detached, Interval, Timeout};
use super::stack::ScrollStackView;
use crate::content::{
    CardTone, Project, ABOUT, CERTIFICATIONS, CONTACT, EXPERIENCE, HERO, MENU, PROJECTS,
};
use crate::desktop::{HOLD_TO_OPEN_MS, OPEN_DESKTOP_EVENT};
use crate::effects::{Decrypt, RevealDirection, DECRYPT_SPEED_MS};

#[derive(Properties, PartialEq)]
pub struct ExternalLinkProps {
    pub href: AttrValue,
    pub label: AttrValue,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(ExternalLink)]
pub fn external_link(props: &ExternalLinkProps) -> Html {
    html! {
        <a
            class={classes!("link", props.class.clone())}
            href={props.href.clone()}
            target="_blank"
            rel="noopener noreferrer"
        >
            {props.label.clone()}
            <span class="external-mark" aria-hidden="true">{"↗"}</span>
            <span class="sr-only">{" (opens in a new tab)"}</span>
        </a>
    }
}

#[derive(Properties, PartialEq)]
pub struct DecryptedTextProps {
    pub text: AttrValue,
    #[prop_or_default]
    pub direction: RevealDirection,
    /// Scramble again whenever the pointer enters.
    #[prop_or_default]
    pub replay_on_hover: bool,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(DecryptedText)]
pub fn decrypted_text(props: &DecryptedTextProps) -> Html {
    let shown = use_state(|| props.text.to_string());
    let ticker: Rc<RefCell<Option<Interval>>> = use_mut_ref(|| None);

    let start = {
        let shown = shown.clone();
        let ticker = ticker.clone();
        let text = props.text.clone();
        let direction = props.direction;
        Callback::from(move |_: ()| {
            if ticker.borrow().is_some() || prefers_reduced_motion() {
                return;
            }

            let mut decrypt = Decrypt::new(&text, direction);
            let shown = shown.clone();
            let finished = ticker.clone();
            let interval = Interval::new(DECRYPT_SPEED_MS, move || {
                let mut random = Math::random;
                match decrypt.tick(&mut random) {
                    Some(frame) => shown.set(frame),
                    None => {
                        shown.set(decrypt.text());
                        let finished = finished.clone();
                        set_timeout_detached(0, move || drop(finished.borrow_mut().take()));
                    }
                }
            });
            *ticker.borrow_mut() = interval;
        })
    };

    {
        let start = start.clone();
        use_effect_with((), move |_| {
            start.emit(());
            || ()
        });
    }

    let onmouseenter = {
        let replay = props.replay_on_hover;
        Callback::from(move |_: MouseEvent| {
            if replay {
                start.emit(());
            }
        })
    };

    html! {
        <span class={classes!("decrypted-text", props.class.clone())} {onmouseenter}>
            <span class="sr-only">{props.text.clone()}</span>
            <span aria-hidden="true">{(*shown).clone()}</span>
        </span>
    }
}

fn open_desktop() {
    let Some(win) = window() else {
        return;
    };
    if let Ok(event) = CustomEvent::new(OPEN_DESKTOP_EVENT) {
        let _ = win.dispatch_event(&event);
    }
}

/// The brand mark. Holding it for two seconds opens the hidden desktop.
#[function_component(LogoTrigger)]
fn logo_trigger() -> Html {
    let hold: Rc<RefCell<Option<Timeout>>> = use_mut_ref(|| None);

    let press = {
        let hold = hold.clone();
        Callback::from(move |_: ()| {
            *hold.borrow_mut() = Timeout::new(HOLD_TO_OPEN_MS, open_desktop);
        })
    };
    let release = {
        let hold = hold.clone();
        Callback::from(move |_: ()| drop(hold.borrow_mut().take()))
    };

    html! {
        <div
            class="logo-trigger"
            title={HERO.logo_hint}
            onmousedown={press.reform(|_: MouseEvent| ())}
            onmouseup={release.reform(|_: MouseEvent| ())}
            onmouseleave={release.reform(|_: MouseEvent| ())}
            ontouchstart={press.reform(|_: TouchEvent| ())}
            ontouchend={release.reform(|_: TouchEvent| ())}
        >
            <span class="logo-mark">{"AKC"}</span>
        </div>
    }
}

#[function_component(BubbleMenu)]
fn bubble_menu() -> Html {
    let open = use_state(|| false);
    let toggle = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(!*open))
    };
    let close = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(false))
    };

    html! {
        <nav class="bubble-menu" aria-label="Main">
            <LogoTrigger />
            <button
                type="button"
                class={classes!("menu-toggle", open.then_some("is-open"))}
                aria-label="Toggle menu"
                aria-pressed={open.to_string()}
                onclick={toggle}
            >
                <span class="menu-line"></span>
                <span class="menu-line"></span>
            </button>
            if *open {
                <ul class="pill-list" role="menu" aria-label="Menu links">
                    { for MENU.iter().enumerate().map(|(index, item)| html! {
                        <li role="none" class="pill-col" style={format!("--item-index: {index}")}>
                            <a
                                role="menuitem"
                                class="pill-link"
                                href={item.anchor}
                                aria-label={item.aria_label}
                                style={format!("--hover-bg: {}", item.hover_bg)}
                                onclick={close.clone()}
                            >
                                {item.label}
                            </a>
                        </li>
                    }) }
                </ul>
            }
        </nav>
    }
}

#[function_component(Hero)]
fn hero() -> Html {
    let contact = Callback::from(|_: MouseEvent| scroll_to_id("contact"));

    html! {
        <header class="hero" id="home">
            <BubbleMenu />
            <div class="hero-copy">
                <h1 class="hero-name">{HERO.name}</h1>
                <h2 class="hero-tagline">
                    <DecryptedText text={HERO.tagline} direction={RevealDirection::Center} />
                </h2>
                <div class="hero-actions">
                    <button type="button" class="button button-primary">{HERO.actions[0]}</button>
                    <button type="button" class="button button-outline" onclick={contact}>
                        {HERO.actions[1]}
                    </button>
                </div>
            </div>
        </header>
    }
}

#[function_component(About)]
fn about() -> Html {
    html! {
        <section id="about" class="section-block about" aria-labelledby="about-heading">
            <h2 id="about-heading">
                <DecryptedText text="About Me" replay_on_hover={true} />
            </h2>
            <div class="about-grid">
                <div class="about-copy">
                    <p>{ABOUT.bio}</p>
                    <p class="muted">{ABOUT.location}</p>
                    <div class="about-facts">
                        <div class="fact-card">
                            <p class="fact-label">{"Degree"}</p>
                            <p class="fact-value">{ABOUT.degree}</p>
                        </div>
                        <div class="fact-card">
                            <p class="fact-label">{"Year"}</p>
                            <p class="fact-value">{ABOUT.year}</p>
                        </div>
                    </div>
                </div>
                <div class="about-arsenal">
                    <h3>{"Technical Arsenal"}</h3>
                    <ul class="inline-list">
                        { for ABOUT.arsenal.iter().map(|skill| html! { <li>{*skill}</li> }) }
                    </ul>
                    <p class="muted">{"Currently researching "}{ABOUT.researching}</p>
                </div>
            </div>
        </section>
    }
}

fn project_card(project: &Project) -> Html {
    let tone = match project.tone {
        CardTone::Dark => "project-card-dark",
        CardTone::Grey => "project-card-grey",
    };

    html! {
        <article class={classes!("project-card", tone)}>
            <h3>{project.title}</h3>
            <p>{project.description}</p>
            <ul class="tag-list">
                { for project.stack.iter().map(|tech| html! { <li class="tag">{*tech}</li> }) }
            </ul>
            <ExternalLink href={project.link} label="View Project" />
        </article>
    }
}

#[function_component(Projects)]
fn projects() -> Html {
    html! {
        <section id="projects" class="section-block projects" aria-labelledby="projects-heading">
            <h2 id="projects-heading">{"Featured Projects"}</h2>
            <ScrollStackView>
                { for PROJECTS.iter().map(project_card) }
            </ScrollStackView>
        </section>
    }
}

#[function_component(Experience)]
fn experience() -> Html {
    html! {
        <section id="experience" class="section-block timeline" aria-labelledby="experience-heading">
            <h2 id="experience-heading">{"Experience & Milestones"}</h2>
            <ol class="timeline-list">
                { for EXPERIENCE.iter().enumerate().map(|(index, event)| html! {
                    <li class={classes!("timeline-item", (index % 2 == 1).then_some("timeline-item-right"))}>
                        <span class="timeline-date">{event.date}</span>
                        <h3>{event.title}</h3>
                        <p>{event.description}</p>
                    </li>
                }) }
            </ol>
        </section>
    }
}

#[function_component(Certifications)]
fn certifications() -> Html {
    html! {
        <section id="certifications" class="section-block" aria-labelledby="certifications-heading">
            <h2 id="certifications-heading">{"Certifications"}</h2>
            <div class="cert-grid">
                { for CERTIFICATIONS.iter().map(|cert| html! {
                    <article class="cert-card">
                        <h3>{cert.title}</h3>
                        <p>{cert.description}</p>
                        <ExternalLink href={cert.link} label="View credential" />
                    </article>
                }) }
            </div>
        </section>
    }
}

#[function_component(Contact)]
fn contact() -> Html {
    html! {
        <section id="contact" class="section-block contact" aria-labelledby="contact-heading">
            <h2 id="contact-heading">{"Get In Touch"}</h2>
            <p>{"Open to internships, research collaborations and interesting problems."}</p>
            <ul class="row-list">
                <li><a class="link" href={CONTACT.mailto()}>{CONTACT.email}</a></li>
                <li><ExternalLink href={CONTACT.linkedin} label="LinkedIn" /></li>
                <li><ExternalLink href={CONTACT.github} label="GitHub" /></li>
            </ul>
        </section>
    }
}

#[function_component(HomePage)]
pub fn home_page() -> Html {
    html! {
        <div class="page-shell">
            <Hero />
            <main id="content">
                <About />
                <Projects />
                <Experience />
                <Certifications />
                <Contact />
            </main>
        </div>
    }
}
