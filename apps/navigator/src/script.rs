use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use client_core::{InputEvent, Key, TouchPoint};
use shared::domain::{PageSet, TransitionKind};

/// One step of a scripted session.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Key(Key),
    Swipe { dx: f64, dy: f64 },
    Click(usize),
    Link(usize),
    Transition(TransitionKind),
    Back,
    Forward,
}

impl FromStr for Gesture {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.trim().split(':');
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        let gesture = match (name.as_str(), args.as_slice()) {
            ("right", []) => Self::Key(Key::ArrowRight),
            ("left", []) => Self::Key(Key::ArrowLeft),
            ("space", []) => Self::Key(Key::Space),
            ("home", []) => Self::Key(Key::Home),
            ("end", []) => Self::Key(Key::End),
            ("back", []) => Self::Back,
            ("forward", []) => Self::Forward,
            ("swipe", [dx, dy]) => Self::Swipe {
                dx: dx.parse().with_context(|| format!("bad swipe dx '{dx}'"))?,
                dy: dy.parse().with_context(|| format!("bad swipe dy '{dy}'"))?,
            },
            ("click", [index]) => Self::Click(
                index
                    .parse()
                    .with_context(|| format!("bad indicator index '{index}'"))?,
            ),
            ("link", [index]) => Self::Link(
                index
                    .parse()
                    .with_context(|| format!("bad link index '{index}'"))?,
            ),
            ("transition", [kind]) => Self::Transition(kind.parse()?),
            _ => bail!("unknown gesture '{raw}'"),
        };
        Ok(gesture)
    }
}

impl Gesture {
    /// Input events a host would deliver for this gesture. History moves are
    /// not input and yield none.
    pub fn events(&self, pages: &PageSet) -> Vec<InputEvent> {
        match self {
            Self::Key(key) => vec![InputEvent::KeyDown(*key)],
            Self::Swipe { dx, dy } => {
                let start = TouchPoint::new(0.0, 0.0);
                vec![
                    InputEvent::TouchStart(start),
                    InputEvent::TouchEnd(TouchPoint::new(start.x + dx, start.y + dy)),
                ]
            }
            Self::Click(index) => vec![InputEvent::IndicatorClick { index: *index }],
            Self::Link(index) => vec![InputEvent::LinkClick {
                index: *index,
                href: pages.route_for(*index).unwrap_or("/").to_string(),
            }],
            Self::Transition(kind) => vec![InputEvent::TransitionSelected(*kind)],
            Self::Back | Self::Forward => Vec::new(),
        }
    }
}

pub fn parse_initial_page(raw: &str, pages: &PageSet) -> anyhow::Result<usize> {
    if let Ok(index) = raw.parse::<usize>() {
        return Ok(index);
    }
    pages
        .index_of(raw)
        .or_else(|| pages.index_of_route(raw))
        .ok_or_else(|| anyhow!("unknown page '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_gesture_form() {
        assert_eq!("right".parse::<Gesture>().unwrap(), Gesture::Key(Key::ArrowRight));
        assert_eq!("END".parse::<Gesture>().unwrap(), Gesture::Key(Key::End));
        assert_eq!(
            "swipe:-80:5".parse::<Gesture>().unwrap(),
            Gesture::Swipe { dx: -80.0, dy: 5.0 }
        );
        assert_eq!("click:3".parse::<Gesture>().unwrap(), Gesture::Click(3));
        assert_eq!(
            "transition:zoom".parse::<Gesture>().unwrap(),
            Gesture::Transition(TransitionKind::Zoom)
        );
        assert_eq!("back".parse::<Gesture>().unwrap(), Gesture::Back);
    }

    #[test]
    fn rejects_malformed_gestures() {
        assert!("swipe:-80".parse::<Gesture>().is_err());
        assert!("click:two".parse::<Gesture>().is_err());
        assert!("transition:spin".parse::<Gesture>().is_err());
        assert!("jump".parse::<Gesture>().is_err());
    }

    #[test]
    fn link_gesture_carries_the_page_route() {
        let events = Gesture::Link(2).events(&PageSet::demo());
        assert_eq!(
            events,
            vec![InputEvent::LinkClick {
                index: 2,
                href: "/effects".to_string()
            }]
        );
    }

    #[test]
    fn initial_page_accepts_index_id_or_route() {
        let pages = PageSet::demo();
        assert_eq!(parse_initial_page("3", &pages).unwrap(), 3);
        assert_eq!(parse_initial_page("effects", &pages).unwrap(), 2);
        assert_eq!(parse_initial_page("/ready", &pages).unwrap(), 4);
        assert!(parse_initial_page("nowhere", &pages).is_err());
    }
}
