use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::display::StatusTab;
use super::model::ORDER_SELECT;

pub const ALL_CATEGORIES: &str = "all";

/// 订单列表的筛选状态：状态页签、渠道分类、搜索词。
/// 每次变更都重新完整查询，不分页也不缓存。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrderFilter {
    pub tab: StatusTab,
    pub category: Option<String>,
    pub search: String,
}

impl OrderFilter {
    pub fn select_tab(&mut self, tab: StatusTab) {
        self.tab = tab;
    }

    pub fn select_category(&mut self, category: &str) {
        self.category = Some(category.to_string());
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
    }

    /// 渠道编码，`all` 或空串表示不过滤
    pub fn category_code(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }

    pub fn search_term(&self) -> Option<&str> {
        Some(self.search.trim()).filter(|s| !s.is_empty())
    }

    pub fn to_query(&self, owner: Option<Uuid>) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(ORDER_SELECT);

        if let Some(user_id) = owner {
            qb.push(" AND o.user_id = ").push_bind(user_id);
        }
        if let Some(status) = self.tab.status() {
            qb.push(" AND o.status = ").push_bind(status);
        }
        if let Some(code) = self.category_code() {
            qb.push(" AND c.code = ").push_bind(code.to_string());
        }
        if let Some(term) = self.search_term() {
            let pattern = format!("%{}%", escape_like(term));
            qb.push(" AND (o.order_no ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR o.note ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY o.created_at DESC");
        qb
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> OrderFilter {
        let mut f = OrderFilter::default();
        f.select_tab(StatusTab::Processing);
        f.select_category("alipay");
        f
    }

    #[test]
    fn search_change_leaves_tab_and_category_alone() {
        let mut f = filter();
        f.set_search("R2025");
        assert_eq!(f.tab, StatusTab::Processing);
        assert_eq!(f.category_code(), Some("alipay"));

        f.set_search("");
        assert_eq!(f.tab, StatusTab::Processing);
        assert_eq!(f.category_code(), Some("alipay"));
    }

    #[test]
    fn tab_and_category_changes_are_independent() {
        let mut f = filter();
        f.set_search("note");
        f.select_tab(StatusTab::Completed);
        assert_eq!(f.category_code(), Some("alipay"));
        assert_eq!(f.search, "note");

        f.select_category(ALL_CATEGORIES);
        assert_eq!(f.tab, StatusTab::Completed);
        assert_eq!(f.category_code(), None);
        assert_eq!(f.search, "note");
    }

    #[test]
    fn default_filter_only_orders() {
        let qb = OrderFilter::default().to_query(None);
        let sql = qb.sql();
        assert!(!sql.contains("o.status ="));
        assert!(!sql.contains("c.code ="));
        assert!(!sql.contains("ILIKE"));
        assert!(sql.trim_end().ends_with("ORDER BY o.created_at DESC"));
    }

    #[test]
    fn every_condition_gets_its_own_bind() {
        let mut f = filter();
        f.set_search("  R2025 ");
        let owner = Uuid::new_v4();
        let qb = f.to_query(Some(owner));
        let sql = qb.sql();

        assert!(sql.contains("o.user_id = $1"));
        assert!(sql.contains("o.status = $2"));
        assert!(sql.contains("c.code = $3"));
        assert!(sql.contains("(o.order_no ILIKE $4 OR o.note ILIKE $5)"));
    }

    #[test]
    fn query_string_shape() {
        let f: OrderFilter =
            serde_json::from_str(r#"{"tab":"cancelled","category":"all","search":"x"}"#).unwrap();
        assert_eq!(f.tab, StatusTab::Cancelled);
        assert_eq!(f.category_code(), None);
        assert_eq!(f.search_term(), Some("x"));

        let empty: OrderFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, OrderFilter::default());
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
