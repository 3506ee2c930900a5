use csv::StringRecord;

/// Number of positional fields in a source row
pub const RAW_FIELD_COUNT: usize = 23;

/// Position of the pickup timestamp
pub const PICKUP_FIELD: usize = 1;
/// Position of the dropoff timestamp
pub const DROPOFF_FIELD: usize = 2;

/// Header written to every normalized file, independent of the input header
pub const OUTPUT_HEADER: [&str; RAW_FIELD_COUNT + 1] = [
    "vendorID",
    "pickupDate",
    "dropoffDate",
    "storeFlag",
    "rateCode",
    "pickupLon",
    "pickupLat",
    "dropoffLon",
    "dropoffLat",
    "passengers",
    "tripDistance",
    "fareAmount",
    "extra",
    "mta",
    "tip",
    "tolls",
    "ehail",
    "improvement",
    "total",
    "paymentType",
    "tripType",
    "pickupLocation",
    "dropoffLocation",
    "type",
];

/// One source row, fields kept exactly as read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTripRecord {
    fields: Vec<String>,
}

impl RawTripRecord {
    /// Returns `None` unless the row has exactly [`RAW_FIELD_COUNT`] fields.
    pub fn from_fields(fields: Vec<String>) -> Option<Self> {
        (fields.len() == RAW_FIELD_COUNT).then_some(Self { fields })
    }

    pub fn from_csv(record: &StringRecord) -> Option<Self> {
        Self::from_fields(record.iter().map(str::to_string).collect())
    }

    pub fn vendor_id(&self) -> &str {
        &self.fields[0]
    }

    pub fn pickup(&self) -> &str {
        &self.fields[PICKUP_FIELD]
    }

    pub fn dropoff(&self) -> &str {
        &self.fields[DROPOFF_FIELD]
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

/// A source row with 24-hour timestamps and the taxi-type tag appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTripRecord {
    fields: Vec<String>,
}

impl NormalizedTripRecord {
    pub(crate) fn new(
        raw: RawTripRecord,
        pickup: String,
        dropoff: String,
        taxi_type: &str,
    ) -> Self {
        let mut fields = raw.into_fields();
        fields[PICKUP_FIELD] = pickup;
        fields[DROPOFF_FIELD] = dropoff;
        fields.push(taxi_type.to_string());
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn pickup(&self) -> &str {
        &self.fields[PICKUP_FIELD]
    }

    pub fn dropoff(&self) -> &str {
        &self.fields[DROPOFF_FIELD]
    }

    pub fn taxi_type(&self) -> &str {
        &self.fields[RAW_FIELD_COUNT]
    }
}
