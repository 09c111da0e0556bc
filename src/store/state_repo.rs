//! System state flags and the operator command audit log.

use chrono::Utc;
use diesel::prelude::*;

use super::models::NewOperatorCommandRow;
use super::schema::{operator_commands, system_state};
use super::Store;
use crate::error::Result;

impl Store {
    /// Read a system state value.
    pub fn system_state(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn()?;
        Ok(system_state::table
            .find(key)
            .select(system_state::value)
            .first::<String>(&mut conn)
            .optional()?)
    }

    /// Upsert a system state value.
    pub fn set_system_state(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let mut conn = self.conn()?;
        diesel::insert_into(system_state::table)
            .values((
                system_state::key.eq(key),
                system_state::value.eq(value),
                system_state::updated_at.eq(&now),
            ))
            .on_conflict(system_state::key)
            .do_update()
            .set((
                system_state::value.eq(value),
                system_state::updated_at.eq(&now),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    pub fn is_kill_switch_active(&self) -> Result<bool> {
        Ok(self.system_state("kill_switch")?.as_deref() == Some("true"))
    }

    pub fn is_paused(&self) -> Result<bool> {
        Ok(self.system_state("paused")?.as_deref() == Some("true"))
    }

    pub fn mode(&self) -> Result<String> {
        Ok(self
            .system_state("mode")?
            .unwrap_or_else(|| "dry-run".to_string()))
    }

    /// Record an operator command for audit.
    pub fn log_operator_command(&self, command: &str, args: &str, result: &str) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_into(operator_commands::table)
            .values(NewOperatorCommandRow {
                command: command.to_string(),
                args: args.to_string(),
                result: result.to_string(),
                executed_at: Utc::now().to_rfc3339(),
            })
            .execute(&mut conn)?;
        Ok(())
    }

    /// Flip a control flag and audit the command in one transaction.
    pub fn set_flag_audited(&self, key: &str, value: bool, command: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let value_str = if value { "true" } else { "false" };
        let mut conn = self.conn()?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(system_state::table)
                .values((
                    system_state::key.eq(key),
                    system_state::value.eq(value_str),
                    system_state::updated_at.eq(&now),
                ))
                .on_conflict(system_state::key)
                .do_update()
                .set((
                    system_state::value.eq(value_str),
                    system_state::updated_at.eq(&now),
                ))
                .execute(conn)?;
            diesel::insert_into(operator_commands::table)
                .values(NewOperatorCommandRow {
                    command: command.to_string(),
                    args: String::new(),
                    result: format!("{key}={value_str}"),
                    executed_at: now.clone(),
                })
                .execute(conn)?;
            Ok(())
        })?;
        Ok(())
    }
}
