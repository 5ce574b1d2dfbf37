use std::rc::Rc;

use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::dom::Interval;
use super::Shell;
use crate::route::Route;
use crate::terminal::{not_found_transcript, typed_prefix, CommandOutcome, TerminalSession, TYPE_INTERVAL_MS};

#[derive(Properties, PartialEq)]
pub struct RouteLinkProps {
    pub to: Route,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub children: Children,
}

/// In-app link that pushes history instead of reloading.
#[function_component(RouteLink)]
pub fn route_link(props: &RouteLinkProps) -> Html {
    let shell = use_context::<Shell>().unwrap_or_default();
    let onclick = {
        let to = props.to.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            shell.navigate.emit(to.clone());
        })
    };

    html! {
        <a class={props.class.clone()} href={props.to.path().to_string()} {onclick}>
            {props.children.clone()}
        </a>
    }
}

#[function_component(TerminalPage)]
pub fn terminal_page() -> Html {
    let shell = use_context::<Shell>().unwrap_or_default();
    let session = use_state(TerminalSession::default);
    let input = use_state(String::new);
    let field = use_node_ref();
    let bottom = use_node_ref();

    {
        let field = field.clone();
        let bottom = bottom.clone();
        use_effect_with(session.history().len(), move |_| {
            if let Some(element) = bottom.cast::<web_sys::Element>() {
                element.scroll_into_view();
            }
            if let Some(field) = field.cast::<HtmlInputElement>() {
                let _ = field.focus();
            }
            || ()
        });
    }

    let onsubmit = {
        let session = session.clone();
        let input = input.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let mut next = (*session).clone();
            let outcome = next.run(&*input);
            session.set(next);
            input.set(String::new());

            if outcome == CommandOutcome::Exit {
                shell.navigate.emit(Route::Home);
            }
        })
    };
    let oninput = {
        let input = input.clone();
        Callback::from(move |event: InputEvent| {
            let target: HtmlInputElement = event.target_unchecked_into();
            input.set(target.value());
        })
    };
    let focus_prompt = {
        let field = field.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(field) = field.cast::<HtmlInputElement>() {
                let _ = field.focus();
            }
        })
    };

    html! {
        <div class="terminal-page" onclick={focus_prompt}>
            <div class="terminal-log" role="log">
                { for session.history().iter().map(|line| html! { <pre class="terminal-line">{line.clone()}</pre> }) }
                <div ref={bottom}></div>
            </div>
            <form class="terminal-prompt" {onsubmit}>
                <label for="terminal-input" class="terminal-caret">{">"}</label>
                <input
                    id="terminal-input"
                    ref={field}
                    type="text"
                    autocomplete="off"
                    spellcheck="false"
                    value={(*input).clone()}
                    {oninput}
                />
            </form>
        </div>
    }
}

/// Characters of the transcript revealed so far.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Typing {
    shown: usize,
    total: usize,
}

impl Reducible for Typing {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        if self.shown >= self.total {
            return self;
        }
        Rc::new(Self {
            shown: self.shown + 1,
            total: self.total,
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct NotFoundProps {
    pub path: AttrValue,
}

#[function_component(NotFoundPage)]
pub fn not_found_page(props: &NotFoundProps) -> Html {
    let transcript = use_memo(props.path.clone(), |path| not_found_transcript(path));
    let typing = use_reducer(|| Typing {
        shown: 0,
        total: transcript.chars().count(),
    });

    {
        let typing = typing.dispatcher();
        use_effect_with(props.path.clone(), move |_| {
            let ticker = Interval::new(TYPE_INTERVAL_MS, move || typing.dispatch(()));
            move || drop(ticker)
        });
    }

    let done = typing.shown >= typing.total;

    html! {
        <div class="not-found-page">
            <pre class="terminal-line">
                {typed_prefix(&transcript, typing.shown)}
                if !done {
                    <span class="terminal-cursor" aria-hidden="true">{"█"}</span>
                }
            </pre>
            if done {
                <div class="not-found-actions">
                    <RouteLink to={Route::Home} class="button button-outline">{"Return Home"}</RouteLink>
                    <RouteLink to={Route::Terminal} class="button button-primary">{"Open Terminal"}</RouteLink>
                </div>
            }
        </div>
    }
}
