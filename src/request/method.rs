//! HTTP method tokens and the per-method constructors.
//!
//! [`Method`] enumerates every token a request may use. Tokens made only of
//! letters, `$` and `_` also get a shortcut constructor on [`Request`], e.g.
//! [`Request::get`] or [`Request::propfind`]. The shortcuts are generated
//! here at compile time and listed in [`SHORTCUTS`].

use std::fmt;
use std::str::FromStr;

use super::builder::Request;
use super::options::RequestOptions;
use crate::error::{Error, Result};

/// Signature shared by every shortcut constructor.
pub type ShortcutFn = fn(String, Option<RequestOptions>) -> Result<Request>;

/// A registered shortcut constructor.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    /// Method the constructor pre-fills.
    pub method: Method,
    /// The constructor.
    pub build: ShortcutFn,
}

impl Shortcut {
    /// Lowercase name of the constructor.
    pub fn name(&self) -> String {
        self.method.as_str().to_ascii_lowercase()
    }
}

macro_rules! methods {
    ($( $(#[$attr:meta])* $variant:ident => $token:literal $(, $shortcut:ident)? ; )+) => {
        /// HTTP method token.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub enum Method {
            $(
                #[doc = concat!("`", $token, "`")]
                $(#[$attr])*
                $variant,
            )+
        }

        impl Method {
            /// Every accepted method, in token order.
            pub const ALL: &'static [Method] = &[$(Method::$variant,)+];

            /// Uppercase token.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Method::$variant => $token,)+
                }
            }
        }

        impl Request {
            $($(
                #[doc = concat!("Creates a `", $token, "` request for `url`.")]
                ///
                /// Keys set in `options` take precedence over the pre-filled
                /// URL and method.
                pub fn $shortcut(
                    url: impl Into<String>,
                    options: impl Into<Option<RequestOptions>>,
                ) -> Result<Request> {
                    Request::with_method(Method::$variant, url, options)
                }
            )?)+
        }

        /// Shortcut constructors, one per method whose token matches `^[A-Z$_]+$`.
        pub static SHORTCUTS: &[Shortcut] = &[
            $($(
                Shortcut {
                    method: Method::$variant,
                    build: {
                        fn $shortcut(url: String, options: Option<RequestOptions>) -> Result<Request> {
                            Request::with_method(Method::$variant, url, options)
                        }
                        $shortcut
                    },
                },
            )?)+
        ];
    };
}

methods! {
    Acl => "ACL", acl;
    Bind => "BIND", bind;
    Checkout => "CHECKOUT", checkout;
    Connect => "CONNECT", connect;
    Copy => "COPY", copy;
    Delete => "DELETE", delete;
    #[default]
    Get => "GET", get;
    Head => "HEAD", head;
    Link => "LINK", link;
    Lock => "LOCK", lock;
    MSearch => "M-SEARCH";
    Merge => "MERGE", merge;
    MkActivity => "MKACTIVITY", mkactivity;
    MkCalendar => "MKCALENDAR", mkcalendar;
    MkCol => "MKCOL", mkcol;
    Move => "MOVE", r#move;
    Notify => "NOTIFY", notify;
    Options => "OPTIONS", options;
    Patch => "PATCH", patch;
    Post => "POST", post;
    PropFind => "PROPFIND", propfind;
    PropPatch => "PROPPATCH", proppatch;
    Purge => "PURGE", purge;
    Put => "PUT", put;
    Rebind => "REBIND", rebind;
    Report => "REPORT", report;
    Search => "SEARCH", search;
    Source => "SOURCE", source;
    Subscribe => "SUBSCRIBE", subscribe;
    Trace => "TRACE", trace;
    Unbind => "UNBIND", unbind;
    Unlink => "UNLINK", unlink;
    Unlock => "UNLOCK", unlock;
    Unsubscribe => "UNSUBSCRIBE", unsubscribe;
}

impl Method {
    /// Returns true if the token qualifies for a shortcut constructor.
    pub fn has_shortcut(&self) -> bool {
        self.as_str()
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b == b'$' || b == b'_')
    }

    /// The shortcut constructor for this method, if it has one.
    pub fn shortcut(&self) -> Option<&'static Shortcut> {
        SHORTCUTS.iter().find(|shortcut| shortcut.method == *self)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Parses a token, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self> {
        let token = s.to_ascii_uppercase();
        Method::ALL
            .iter()
            .find(|method| method.as_str() == token)
            .copied()
            .ok_or_else(|| Error::validation(format!("Provided method: {} doesn't exist.", token)))
    }
}
