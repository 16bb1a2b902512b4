use resolver_address::{parse, ParseMode, TokenTree};

/// The canonical-rewrite hook (component C4). The engine treats this
/// purely as a black box: its only contract is that it may change
/// which routing operators appear in the tree (for example folding a
/// bangpath or percent-hack into a plain `@`), not that it does
/// anything in particular. A real deployment plugs in whatever policy
/// engine owns address canonicalization; [`NormalizingRewrite`] is the
/// strightforward default that implements just the two conversions the
/// peeling loop needs to make progress.
pub trait RewriteHook: Send + Sync {
    fn rewrite(&self, ruleset: &str, tree: &mut TokenTree);
}

/// Converts a leading bangpath (`site!user` -> `user@site`) and/or a
/// percent-hack localpart (`user%host` -> `user@host`) into `@` form,
/// one substitution per call. The peeling loop re-invokes this until
/// neither operator remains.
pub struct NormalizingRewrite {
    pub swap_bangpath: bool,
    pub percent_hack: bool,
    pub mode: ParseMode,
}

impl RewriteHook for NormalizingRewrite {
    fn rewrite(&self, _ruleset: &str, tree: &mut TokenTree) {
        let text = tree.to_internal();

        let mut rewritten = None;
        if self.swap_bangpath {
            if let Some(pos) = text.find('!') {
                let host = &text[..pos];
                let rest = &text[pos + 1..];
                rewritten = Some(format!("{rest}@{host}"));
            }
        }
        if rewritten.is_none() && self.percent_hack {
            let (localpart, domain) = match text.split_once('@') {
                Some((l, r)) => (l, Some(r)),
                None => (text.as_str(), None),
            };
            if let Some(pos) = localpart.find('%') {
                let new_local = format!("{}@{}", &localpart[..pos], &localpart[pos + 1..]);
                rewritten = Some(match domain {
                    Some(r) => format!("{new_local}@{r}"),
                    None => new_local,
                });
            }
        }

        if let Some(text) = rewritten {
            if let Ok(new_tree) = parse(&text, self.mode) {
                *tree = new_tree;
            }
        }
    }
}

/// A hook that never rewrites anything; useful for tests that exercise
/// addresses with no bangpath/percent content.
pub struct NoopRewrite;

impl RewriteHook for NoopRewrite {
    fn rewrite(&self, _ruleset: &str, _tree: &mut TokenTree) {}
}

#[cfg(test)]
mod test {
    use super::*;
    use resolver_address::parse;

    #[test]
    fn bangpath_becomes_at_form() {
        let hook = NormalizingRewrite {
            swap_bangpath: true,
            percent_hack: false,
            mode: ParseMode::Dequoted,
        };
        let mut tree = parse("relayhost!user", ParseMode::Dequoted).unwrap();
        hook.rewrite("canonical", &mut tree);
        assert_eq!(tree.to_internal(), "user@relayhost");
    }

    #[test]
    fn percent_hack_becomes_at_form() {
        let hook = NormalizingRewrite {
            swap_bangpath: false,
            percent_hack: true,
            mode: ParseMode::Dequoted,
        };
        let mut tree = parse("user%host", ParseMode::Dequoted).unwrap();
        hook.rewrite("canonical", &mut tree);
        assert_eq!(tree.to_internal(), "user@host");
    }
}
