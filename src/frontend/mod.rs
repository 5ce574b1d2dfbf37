//! Browser entry point: the app shell, routing and the global key listener.

mod dom;
mod overlays;
mod pages;
mod sections;
mod stack;

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{window, Event, KeyboardEvent};
use yew::prelude::*;

use crate::easter_eggs::{EasterEgg, EasterEggKeys, Notice, UiAction, UiFlags};
use crate::route::Route;
use dom::{current_path, is_text_field, push_history, Listener};
use overlays::{HiddenDesktop, MatrixRainCanvas, SentientModal, Toast, Toaster, VisionOverlay};
use pages::{NotFoundPage, TerminalPage};
use sections::HomePage;

/// Handles shared through context by every page and overlay.
#[derive(Clone, Default, PartialEq)]
pub struct Shell {
    pub navigate: Callback<Route>,
    pub notify: Callback<Notice>,
    pub ui: Callback<UiAction>,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct PageState {
    flags: UiFlags,
    toasts: Vec<Toast>,
    next_toast: u64,
}

enum PageAction {
    Ui(UiAction),
    Notify(Notice),
    Dismiss(u64),
}

impl PageState {
    fn push_toast(&mut self, notice: Notice) {
        self.toasts.push(Toast {
            id: self.next_toast,
            notice,
        });
        self.next_toast += 1;
    }
}

impl Reducible for PageState {
    type Action = PageAction;

    fn reduce(self: Rc<Self>, action: PageAction) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            PageAction::Ui(action) => {
                if let Some(notice) = next.flags.reduce(action) {
                    next.push_toast(notice);
                }
            }
            PageAction::Notify(notice) => next.push_toast(notice),
            PageAction::Dismiss(id) => next.toasts.retain(|toast| toast.id != id),
        }

        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

#[function_component(App)]
fn app() -> Html {
    let page = use_reducer(PageState::default);
    let route = use_state(|| Route::from_path(&current_path()));
    let keys = use_mut_ref(EasterEggKeys::default);

    let shell = {
        let dispatcher = page.dispatcher();
        let set_route = route.setter();
        use_memo((), move |_| {
            let ui = {
                let dispatcher = dispatcher.clone();
                Callback::from(move |action: UiAction| dispatcher.dispatch(PageAction::Ui(action)))
            };
            let notify = Callback::from(move |notice: Notice| dispatcher.dispatch(PageAction::Notify(notice)));
            let navigate = Callback::from(move |next: Route| {
                push_history(next.path());
                set_route.set(next);
            });

            Shell {
                navigate,
                notify,
                ui,
            }
        })
    };

    {
        let set_route = route.setter();
        use_effect_with((), move |_| {
            let listener = Listener::on_window("popstate", move |_| {
                set_route.set(Route::from_path(&current_path()));
            });
            move || drop(listener)
        });
    }

    // Easter eggs belong to the index page.
    {
        let ui = shell.ui.clone();
        use_effect_with((*route).clone(), move |route| {
            if *route != Route::Home {
                ui.emit(UiAction::Reset);
            }
            || ()
        });
    }

    {
        let shell = (*shell).clone();
        use_effect_with((), move |_| {
            let listener = Listener::on_window("keydown", move |event: Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let in_text_field = event.target().is_some_and(|target| is_text_field(&target));

                let Some(egg) = keys.borrow_mut().handle(&event.key(), in_text_field) else {
                    return;
                };
                shell.ui.emit(UiAction::Trigger(egg));
                if egg == EasterEgg::Terminal {
                    shell.navigate.emit(Route::Terminal);
                }
            });
            move || drop(listener)
        });
    }

    let on_dismiss = {
        let dispatcher = page.dispatcher();
        Callback::from(move |id: u64| dispatcher.dispatch(PageAction::Dismiss(id)))
    };

    let content = match &*route {
        Route::Home => html! { <HomePage /> },
        Route::Terminal => html! { <TerminalPage /> },
        Route::NotFound(path) => html! { <NotFoundPage key={path.clone()} path={path.clone()} /> },
    };

    html! {
        <ContextProvider<Shell> context={(*shell).clone()}>
            {content}
            if page.flags.matrix {
                <MatrixRainCanvas />
            }
            if page.flags.vision {
                <VisionOverlay />
            }
            <HiddenDesktop phase={page.flags.desktop} />
            if page.flags.sentient {
                <SentientModal key={page.flags.sentient_session} />
            }
            <Toaster toasts={page.toasts.clone()} {on_dismiss} />
        </ContextProvider<Shell>>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
