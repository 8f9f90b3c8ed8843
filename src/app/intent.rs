/// 使用者在一行輸入中表達的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add(String),
    Delete(String),
    Clear,
    RemoveUnavailable,
    Copy,
    KeepBest,
    Purchase,
    List,
    Export,
    Help,
    Quit,
}

impl Intent {
    /// 不是指令的整行都當作要加入的域名，等同在輸入框按 Enter
    pub fn parse(line: &str) -> Intent {
        let trimmed = line.trim();
        let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (trimmed, ""),
        };

        match (keyword.to_lowercase().as_str(), rest.is_empty()) {
            ("add", _) => Intent::Add(rest.to_string()),
            ("delete" | "del" | "rm", _) => Intent::Delete(rest.to_string()),
            ("clear", true) => Intent::Clear,
            ("check" | "remove-unavailable", true) => Intent::RemoveUnavailable,
            ("copy", true) => Intent::Copy,
            ("best" | "keep-best", true) => Intent::KeepBest,
            ("buy" | "purchase", true) => Intent::Purchase,
            ("list" | "ls", true) => Intent::List,
            ("export", true) => Intent::Export,
            ("help" | "?", true) => Intent::Help,
            ("quit" | "exit", true) => Intent::Quit,
            _ => Intent::Add(trimmed.to_string()),
        }
    }
}

pub const HELP: &str = "\
Commands:
  <domain> | add <domain>     add a .com, .app or .xyz domain
  delete <domain>             remove a domain (aliases: del, rm)
  clear                       empty the cart
  check                       remove domains that are no longer available
  copy                        copy the cart as a comma separated list
  best                        keep the best domains (.com > .app > .xyz, shorter first)
  buy                         purchase once the cart is full
  list                        show the cart
  export                      print the cart as JSON
  quit                        leave";
