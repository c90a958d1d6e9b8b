use wikidata_api_model::QueryOptions;

/// The parameters of a single page request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub offset: usize,
    pub limit: usize,
    /// The slice of the identifier list that is requested, if any.
    pub values: Option<Vec<String>>,
}

impl PageRequest {
    /// The query options of this request. Identifier lists are already sliced and are therefore
    /// passed without an offset or a limit.
    pub fn query_options(&self) -> QueryOptions {
        match &self.values {
            Some(values) => QueryOptions::default().with_values(values.iter().cloned()),
            None => QueryOptions::default()
                .with_limit(self.limit)
                .with_offset(self.offset),
        }
    }
}

/// The state machine that drives a paginated fetch.
///
/// Pages are requested strictly in order. Without an identifier list, pages are addressed with
/// `LIMIT` and `OFFSET`. With an identifier list, each page binds a slice of the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    remaining: Option<usize>,
    values: Option<Vec<String>>,
    single_page: bool,
    finished: bool,
}

impl Pager {
    /// Creates a new pager. `page = None` requests all pages, starting at the first one.
    pub fn new(
        page: Option<usize>,
        page_size: usize,
        limit: Option<usize>,
        values: Option<Vec<String>>,
    ) -> Self {
        let remaining = match (limit, &values) {
            (Some(limit), Some(values)) => Some(limit.min(values.len())),
            (Some(limit), None) => Some(limit),
            (None, Some(values)) => Some(values.len()),
            (None, None) => None,
        };
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.max(1),
            remaining,
            values,
            single_page: page.is_some(),
            finished: remaining == Some(0),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the next page to request, or [None] if the fetch is complete.
    pub fn next_request(&self) -> Option<PageRequest> {
        if self.finished {
            return None;
        }
        let offset = (self.page - 1).saturating_mul(self.page_size);
        let limit = self
            .remaining
            .map_or(self.page_size, |remaining| remaining.min(self.page_size));
        let values = match &self.values {
            Some(values) => {
                let start = offset.min(values.len());
                let end = start.saturating_add(limit).min(values.len());
                if start == end {
                    return None;
                }
                Some(values[start..end].to_vec())
            }
            None => None,
        };
        Some(PageRequest {
            page: self.page,
            offset,
            limit,
            values,
        })
    }

    /// Records the response to `request` and advances to the next page.
    pub fn record(&mut self, request: &PageRequest, rows: usize) {
        if self.single_page || (self.values.is_none() && rows == 0) {
            self.finished = true;
        }
        if let Some(remaining) = self.remaining {
            let remaining = remaining.saturating_sub(request.limit);
            self.remaining = Some(remaining);
            if remaining == 0 {
                self.finished = true;
            }
        }
        self.page += 1;
        if let Some(values) = &self.values {
            if (self.page - 1).saturating_mul(self.page_size) >= values.len() {
                self.finished = true;
            }
        }
    }
}
