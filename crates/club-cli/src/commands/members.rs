use anyhow::Result;
use clap::{Args, Subcommand};

use club_accounting::{dues::DuesRecord, reports, roster, LedgerError};
use club_db::Connection;
use club_domain::{Member, MemberFilter, Query, Retrieve};

use crate::{commands::confirm, config::Session, formatting::print};

#[derive(Subcommand, Debug)]
pub enum Members {
    /// Show a member
    #[clap(name = "show")]
    Show(ShowMember),
    /// List members
    #[clap(name = "list")]
    List(ListMembers),
    /// Register a member
    #[clap(name = "add")]
    Add(AddMember),
    /// Correct the name of a member
    #[clap(name = "rename")]
    Rename(RenameMember),
    /// Activate or deactivate a member
    #[clap(name = "toggle")]
    Toggle(ToggleMember),
    /// Recompute the debtor status of all members
    #[clap(name = "refresh")]
    Refresh,
    /// List active members owing dues or insurance
    #[clap(name = "debtors")]
    Debtors,
}

impl Members {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        match self {
            Members::Show(cmd) => cmd.run(db, session).await,
            Members::List(cmd) => cmd.run(db, session).await,
            Members::Add(cmd) => cmd.run(db, session).await,
            Members::Rename(cmd) => cmd.run(db, session).await,
            Members::Toggle(cmd) => cmd.run(db, session).await,
            Members::Refresh => {
                let changed = roster::refresh_debtors(db, &session.ctx).await?;
                if !session.json {
                    println!("{} members changed status.", changed.len());
                }
                print(&changed, session.json)
            }
            Members::Debtors => {
                let debtors = reports::debtors(db, &session.ctx).await?;
                if !session.json {
                    println!("{} debtors.", debtors.len());
                }
                print(&debtors, session.json)
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct ShowMember {
    #[clap(short, long)]
    pub id: u32,
}

impl ShowMember {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let member: Member = db
            .retrieve(self.id)
            .await
            .map_err(LedgerError::lookup("member", self.id))?;
        print(&member.refresh_status(session.ctx.today()), session.json)
    }
}

#[derive(Args, Debug)]
pub struct ListMembers {
    /// Part of the name or surname
    #[clap(short, long)]
    pub name: Option<String>,
    /// Include inactive members
    #[clap(short, long)]
    pub all: bool,
    /// Only members owing dues or insurance
    #[clap(short, long)]
    pub debtors: bool,
}

impl ListMembers {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let filter = MemberFilter {
            name: self.name,
            active: if self.all { None } else { Some(true) },
            ..Default::default()
        };
        let today = session.ctx.today();
        let members: Vec<Member> = Query::<Member>::query(db, &filter)
            .await?
            .into_iter()
            .map(|member| member.refresh_status(today))
            .filter(|member| !self.debtors || member.is_debtor())
            .collect();
        if !session.json {
            println!("{} members.", members.len());
        }
        print(&members, session.json)
    }
}

#[derive(Args, Debug)]
pub struct AddMember {
    #[clap(short, long)]
    pub name: String,
    #[clap(short, long)]
    pub surname: String,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl AddMember {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let question = format!("Register {} {}?", self.name.trim(), self.surname.trim());
        if !confirm(&question, self.yes)? {
            return Ok(());
        }
        let member = roster::register(db, &session.ctx, &self.name, &self.surname).await?;
        if !session.json {
            println!("Member registered with id {}.", member.id);
        }
        print(&member, session.json)
    }
}

#[derive(Args, Debug)]
pub struct RenameMember {
    #[clap(short, long)]
    pub id: u32,
    #[clap(short, long)]
    pub name: String,
    #[clap(short, long)]
    pub surname: String,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl RenameMember {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let member: Member = db
            .retrieve(self.id)
            .await
            .map_err(LedgerError::lookup("member", self.id))?;
        let question = format!(
            "Rename {} to {} {}?",
            member.full_name(),
            self.name.trim(),
            self.surname.trim()
        );
        if !confirm(&question, self.yes)? {
            return Ok(());
        }
        let member = roster::rename(db, self.id, &self.name, &self.surname).await?;
        print(&member.refresh_status(session.ctx.today()), session.json)
    }
}

#[derive(Args, Debug)]
pub struct ToggleMember {
    #[clap(short, long)]
    pub id: u32,
}

impl ToggleMember {
    pub async fn run(self, db: &Connection, session: &Session) -> Result<()> {
        let member = roster::toggle_active(db, self.id).await?;
        if !session.json {
            let status = if member.active { "active" } else { "inactive" };
            println!("{} is now {}.", member.full_name(), status);
            return Ok(());
        }
        print(&member, session.json)
    }
}
