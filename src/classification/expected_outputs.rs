//! Reference `predict_proba` outputs of classifiers on two benchmark
//! datasets: the two-class unit-test data and the four-class basic motions
//! data. Each table holds the probabilities for the first ten test
//! instances, in the order the classifiers' `classes()` report.

/// Probabilities on the unit-test dataset (two classes).
pub type UnitTestProba = [[f64; 2]; 10];

/// Probabilities on the basic motions dataset (four classes).
pub type BasicMotionsProba = [[f64; 4]; 10];

static UNIT_TEST_BOSS_ENSEMBLE: UnitTestProba = [
    [0.2, 0.8],
    [0.8, 0.2],
    [0.2, 0.8],
    [1.0, 0.0],
    [1.0, 0.0],
    [0.4, 0.6],
    [0.8, 0.2],
    [0.0, 1.0],
    [0.8, 0.2],
    [1.0, 0.0],
];

static UNIT_TEST_CONTRACTABLE_BOSS: UnitTestProba = [
    [0.18463378, 0.81536622],
    [0.81536622, 0.18463378],
    [0.31868253, 0.68131747],
    [0.86595126, 0.13404874],
    [1.0, 0.0],
    [1.0, 0.0],
    [0.81536622, 0.18463378],
    [0.36926757, 0.63073243],
    [1.0, 0.0],
    [0.86595126, 0.13404874],
];

static UNIT_TEST_TEMPORAL_DICTIONARY_ENSEMBLE: UnitTestProba = [
    [0.0, 1.0],
    [0.4924, 0.5076],
    [0.0, 1.0],
    [0.9043, 0.0957],
    [0.8016, 0.1984],
    [1.0, 0.0],
    [0.706, 0.294],
    [0.0, 1.0],
    [0.8016, 0.1984],
    [1.0, 0.0],
];

static UNIT_TEST_WEASEL: UnitTestProba = [
    [0.20366595, 0.79633405],
    [0.97761497, 0.02238503],
    [0.05127821, 0.94872179],
    [0.81435354, 0.18564646],
    [0.91971316, 0.08028684],
    [0.97877426, 0.02122574],
    [0.16694218, 0.83305782],
    [0.04834253, 0.95165747],
    [0.93156332, 0.06843668],
    [0.97714351, 0.02285649],
];

static UNIT_TEST_ELASTIC_ENSEMBLE: UnitTestProba = [
    [0.0, 1.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [0.33333333, 0.66666667],
    [1.0, 0.0],
    [0.66666667, 0.33333333],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 0.0],
];

static UNIT_TEST_SHAPE_DTW: UnitTestProba = [
    [0.0, 1.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 0.0],
];

static UNIT_TEST_CATCH22_CLASSIFIER: UnitTestProba = [
    [0.0, 1.0],
    [1.0, 0.0],
    [0.1, 0.9],
    [0.8, 0.2],
    [0.6, 0.4],
    [0.9, 0.1],
    [0.6, 0.4],
    [0.2, 0.8],
    [0.8, 0.2],
    [0.8, 0.2],
];

static UNIT_TEST_MATRIX_PROFILE_CLASSIFIER: UnitTestProba = [
    [0.0, 1.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [0.0, 1.0],
    [0.0, 1.0],
    [0.0, 1.0],
];

static UNIT_TEST_RANDOM_INTERVAL_CLASSIFIER: UnitTestProba = [
    [0.0, 1.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [0.2, 0.8],
    [0.8, 0.2],
    [1.0, 0.0],
];

static UNIT_TEST_SIGNATURE_CLASSIFIER: UnitTestProba = [
    [0.1, 0.9],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [0.9, 0.1],
    [0.8, 0.2],
    [0.8, 0.2],
    [0.0, 1.0],
    [0.8, 0.2],
    [1.0, 0.0],
];

static UNIT_TEST_SUMMARY_CLASSIFIER: UnitTestProba = [
    [0.0, 1.0],
    [0.9, 0.1],
    [0.0, 1.0],
    [0.9, 0.1],
    [0.9, 0.1],
    [1.0, 0.0],
    [0.8, 0.2],
    [0.6, 0.4],
    [0.9, 0.1],
    [1.0, 0.0],
];

static UNIT_TEST_HIVECOTEV1: UnitTestProba = [
    [0.0, 1.0],
    [0.5524, 0.4476],
    [0.0, 1.0],
    [0.8285, 0.1715],
    [0.8839, 0.1161],
    [0.9746, 0.0254],
    [0.7181, 0.2819],
    [0.0, 1.0],
    [0.7911, 0.2089],
    [0.7167, 0.2833],
];

static UNIT_TEST_HIVECOTEV2: UnitTestProba = [
    [0.0, 1.0],
    [0.4563, 0.5437],
    [0.0379, 0.9621],
    [1.0, 0.0],
    [0.719, 0.281],
    [1.0, 0.0],
    [0.8477, 0.1523],
    [0.0379, 0.9621],
    [0.6902, 0.3098],
    [1.0, 0.0],
];

static UNIT_TEST_CANONICAL_INTERVAL_FOREST: UnitTestProba = [
    [0.41, 0.59],
    [0.7333, 0.2667],
    [0.1833, 0.8167],
    [0.7667, 0.2333],
    [0.5, 0.5],
    [0.76, 0.24],
    [0.8, 0.2],
    [0.2833, 0.7167],
    [0.86, 0.14],
    [0.7, 0.3],
];

static UNIT_TEST_DR_CIF: UnitTestProba = [
    [0.0, 1.0],
    [0.8, 0.2],
    [0.2, 0.8],
    [1.0, 0.0],
    [0.7, 0.3],
    [0.9, 0.1],
    [0.9, 0.1],
    [0.3, 0.7],
    [0.8, 0.2],
    [1.0, 0.0],
];

static UNIT_TEST_RANDOM_INTERVAL_SPECTRAL_ENSEMBLE: UnitTestProba = [
    [0.1, 0.9],
    [0.8, 0.2],
    [0.0, 1.0],
    [0.7, 0.3],
    [1.0, 0.0],
    [1.0, 0.0],
    [0.6, 0.4],
    [0.0, 1.0],
    [0.7, 0.3],
    [0.9, 0.1],
];

static UNIT_TEST_SUPERVISED_TIME_SERIES_FOREST: UnitTestProba = [
    [0.0, 1.0],
    [0.8, 0.2],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [0.1, 0.9],
    [1.0, 0.0],
    [1.0, 0.0],
];

static UNIT_TEST_TIME_SERIES_FOREST_CLASSIFIER: UnitTestProba = [
    [0.1, 0.9],
    [0.7, 0.3],
    [0.0, 1.0],
    [1.0, 0.0],
    [0.8, 0.2],
    [1.0, 0.0],
    [0.8, 0.2],
    [0.0, 1.0],
    [0.8, 0.2],
    [0.9, 0.1],
];

static UNIT_TEST_ARSENAL: UnitTestProba = [
    [-0.0, 1.0],
    [1.0, -0.0],
    [-0.0, 1.0],
    [1.0, -0.0],
    [0.9236, 0.0764],
    [1.0, -0.0],
    [0.4506, 0.5494],
    [-0.0, 1.0],
    [1.0, -0.0],
    [1.0, -0.0],
];

static UNIT_TEST_ROCKET_CLASSIFIER: UnitTestProba = [
    [0.0, 1.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 0.0],
];

static UNIT_TEST_SHAPELET_TRANSFORM_CLASSIFIER: UnitTestProba = [
    [0.0, 1.0],
    [0.6, 0.4],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 0.0],
];

static BASIC_MOTIONS_COLUMN_ENSEMBLE_CLASSIFIER: BasicMotionsProba = [
    [0.25, 0.25, 0.25, 0.25],
    [0.5, 0.25, 0.25, 0.0],
    [0.0, 0.0, 0.5, 0.5],
    [0.5, 0.0, 0.5, 0.0],
    [0.25, 0.0, 0.5, 0.25],
    [0.25, 0.25, 0.5, 0.0],
    [0.75, 0.25, 0.0, 0.0],
    [0.0, 0.0, 0.75, 0.25],
    [0.0, 0.5, 0.25, 0.25],
    [0.0, 0.5, 0.25, 0.25],
];

static BASIC_MOTIONS_MUSE: BasicMotionsProba = [
    [0.0019, 0.0013, 0.0009, 0.9959],
    [0.8212, 0.0796, 0.0336, 0.0657],
    [0.0111, 0.0098, 0.9602, 0.019],
    [0.0576, 0.9091, 0.0143, 0.019],
    [0.0032, 0.0049, 0.0021, 0.9898],
    [0.0036, 0.0016, 0.0026, 0.9922],
    [0.8459, 0.0698, 0.0328, 0.0514],
    [0.0562, 0.0186, 0.8846, 0.0405],
    [0.0573, 0.9249, 0.0102, 0.0076],
    [0.0106, 0.9833, 0.004, 0.0022],
];

static BASIC_MOTIONS_TEMPORAL_DICTIONARY_ENSEMBLE: BasicMotionsProba = [
    [0.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.6261, 0.3739, 0.0],
    [0.0, 0.0, 0.0, 1.0],
    [0.0, 0.0, 0.0, 1.0],
    [0.7478, 0.0, 0.0, 0.2522],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.7478, 0.2522, 0.0],
    [0.0, 0.7478, 0.2522, 0.0],
];

static BASIC_MOTIONS_CATCH22_CLASSIFIER: BasicMotionsProba = [
    [0.0, 0.2, 0.2, 0.6],
    [0.0, 0.9, 0.0, 0.1],
    [0.2, 0.2, 0.3, 0.3],
    [0.2, 0.5, 0.3, 0.0],
    [0.0, 0.2, 0.1, 0.7],
    [0.0, 0.0, 0.4, 0.6],
    [0.2, 0.4, 0.2, 0.2],
    [0.1, 0.0, 0.7, 0.2],
    [0.1, 0.7, 0.1, 0.1],
    [0.0, 0.9, 0.0, 0.1],
];

static BASIC_MOTIONS_RANDOM_INTERVAL_CLASSIFIER: BasicMotionsProba = [
    [0.0, 0.0, 0.2, 0.8],
    [0.3, 0.1, 0.1, 0.5],
    [0.0, 0.0, 0.8, 0.2],
    [0.2, 0.7, 0.0, 0.1],
    [0.0, 0.1, 0.4, 0.5],
    [0.0, 0.0, 0.4, 0.6],
    [0.2, 0.3, 0.1, 0.4],
    [0.0, 0.1, 0.9, 0.0],
    [0.1, 0.8, 0.0, 0.1],
    [0.1, 0.7, 0.0, 0.2],
];

static BASIC_MOTIONS_SIGNATURE_CLASSIFIER: BasicMotionsProba = [
    [0.0, 0.0, 0.5, 0.5],
    [0.4, 0.0, 0.3, 0.3],
    [0.0, 0.0, 0.9, 0.1],
    [0.2, 0.3, 0.1, 0.4],
    [0.0, 0.0, 0.4, 0.6],
    [0.0, 0.0, 0.7, 0.3],
    [0.1, 0.0, 0.6, 0.3],
    [0.0, 0.0, 0.9, 0.1],
    [0.0, 0.7, 0.1, 0.2],
    [0.2, 0.3, 0.1, 0.4],
];

static BASIC_MOTIONS_SUMMARY_CLASSIFIER: BasicMotionsProba = [
    [0.0, 0.0, 0.3, 0.7],
    [0.5, 0.2, 0.1, 0.2],
    [0.0, 0.0, 0.8, 0.2],
    [0.0, 1.0, 0.0, 0.0],
    [0.1, 0.1, 0.2, 0.6],
    [0.0, 0.0, 0.3, 0.7],
    [0.5, 0.2, 0.1, 0.2],
    [0.0, 0.0, 0.8, 0.2],
    [0.1, 0.9, 0.0, 0.0],
    [0.1, 0.9, 0.0, 0.0],
];

static BASIC_MOTIONS_HIVECOTEV2: BasicMotionsProba = [
    [0.0, 0.0222, 0.0222, 0.9557],
    [0.8065, 0.0701, 0.0, 0.1235],
    [0.0222, 0.0, 0.858, 0.1198],
    [0.0701, 0.2803, 0.3774, 0.2722],
    [0.0222, 0.0, 0.0701, 0.9078],
    [0.0222, 0.0, 0.1144, 0.8634],
    [0.7843, 0.1845, 0.0, 0.0312],
    [0.0222, 0.0, 0.8483, 0.1295],
    [0.0922, 0.7843, 0.0922, 0.0312],
    [0.0, 0.9466, 0.0222, 0.0312],
];

static BASIC_MOTIONS_CANONICAL_INTERVAL_FOREST: BasicMotionsProba = [
    [0.0, 0.0, 0.3, 0.7],
    [0.6, 0.2, 0.2, 0.0],
    [0.0, 0.1, 0.6, 0.3],
    [0.1, 0.5, 0.0, 0.4],
    [0.0, 0.0, 0.3, 0.7],
    [0.0, 0.0, 0.3, 0.7],
    [0.6, 0.2, 0.0, 0.2],
    [0.2, 0.0, 0.6, 0.2],
    [0.0, 0.5, 0.1, 0.4],
    [0.3, 0.7, 0.0, 0.0],
];

static BASIC_MOTIONS_DR_CIF: BasicMotionsProba = [
    [0.1, 0.1, 0.3, 0.5],
    [0.8, 0.2, 0.0, 0.0],
    [0.0, 0.1, 0.7, 0.2],
    [0.3, 0.6, 0.0, 0.1],
    [0.2, 0.0, 0.2, 0.6],
    [0.0, 0.1, 0.4, 0.5],
    [0.5, 0.5, 0.0, 0.0],
    [0.0, 0.0, 0.8, 0.2],
    [0.3, 0.7, 0.0, 0.0],
    [0.2, 0.8, 0.0, 0.0],
];

static BASIC_MOTIONS_ARSENAL: BasicMotionsProba = [
    [-0.0, 0.158, -0.0, 0.842],
    [1.0, -0.0, -0.0, -0.0],
    [0.6394, 0.3606, -0.0, -0.0],
    [-0.0, -0.0, 0.586, 0.414],
    [-0.0, -0.0, 0.2254, 0.7746],
    [-0.0, -0.0, 0.256, 0.744],
    [0.7771, 0.2229, -0.0, -0.0],
    [0.256, 0.2229, 0.3631, 0.158],
    [-0.0, 0.842, 0.158, -0.0],
    [-0.0, 1.0, -0.0, -0.0],
];

static BASIC_MOTIONS_ROCKET_CLASSIFIER: BasicMotionsProba = [
    [0.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
    [0.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
];

static BASIC_MOTIONS_SHAPELET_TRANSFORM_CLASSIFIER: BasicMotionsProba = [
    [0.0, 0.0, 0.2, 0.8],
    [0.2, 0.8, 0.0, 0.0],
    [0.0, 0.2, 0.6, 0.2],
    [0.2, 0.6, 0.2, 0.0],
    [0.0, 0.0, 0.2, 0.8],
    [0.0, 0.0, 0.2, 0.8],
    [0.2, 0.6, 0.0, 0.2],
    [0.0, 0.2, 0.8, 0.0],
    [0.4, 0.4, 0.0, 0.2],
    [0.2, 0.6, 0.0, 0.2],
];

static UNIT_TEST_TABLE: &[(&str, &UnitTestProba)] = &[
    ("BOSSEnsemble", &UNIT_TEST_BOSS_ENSEMBLE),
    ("ContractableBOSS", &UNIT_TEST_CONTRACTABLE_BOSS),
    ("TemporalDictionaryEnsemble", &UNIT_TEST_TEMPORAL_DICTIONARY_ENSEMBLE),
    ("WEASEL", &UNIT_TEST_WEASEL),
    ("ElasticEnsemble", &UNIT_TEST_ELASTIC_ENSEMBLE),
    ("ShapeDTW", &UNIT_TEST_SHAPE_DTW),
    ("Catch22Classifier", &UNIT_TEST_CATCH22_CLASSIFIER),
    ("MatrixProfileClassifier", &UNIT_TEST_MATRIX_PROFILE_CLASSIFIER),
    ("RandomIntervalClassifier", &UNIT_TEST_RANDOM_INTERVAL_CLASSIFIER),
    ("SignatureClassifier", &UNIT_TEST_SIGNATURE_CLASSIFIER),
    ("SummaryClassifier", &UNIT_TEST_SUMMARY_CLASSIFIER),
    ("HIVECOTEV1", &UNIT_TEST_HIVECOTEV1),
    ("HIVECOTEV2", &UNIT_TEST_HIVECOTEV2),
    ("CanonicalIntervalForest", &UNIT_TEST_CANONICAL_INTERVAL_FOREST),
    ("DrCIF", &UNIT_TEST_DR_CIF),
    ("RandomIntervalSpectralEnsemble", &UNIT_TEST_RANDOM_INTERVAL_SPECTRAL_ENSEMBLE),
    ("SupervisedTimeSeriesForest", &UNIT_TEST_SUPERVISED_TIME_SERIES_FOREST),
    ("TimeSeriesForestClassifier", &UNIT_TEST_TIME_SERIES_FOREST_CLASSIFIER),
    ("Arsenal", &UNIT_TEST_ARSENAL),
    ("RocketClassifier", &UNIT_TEST_ROCKET_CLASSIFIER),
    ("ShapeletTransformClassifier", &UNIT_TEST_SHAPELET_TRANSFORM_CLASSIFIER),
];

static BASIC_MOTIONS_TABLE: &[(&str, &BasicMotionsProba)] = &[
    ("ColumnEnsembleClassifier", &BASIC_MOTIONS_COLUMN_ENSEMBLE_CLASSIFIER),
    ("MUSE", &BASIC_MOTIONS_MUSE),
    ("TemporalDictionaryEnsemble", &BASIC_MOTIONS_TEMPORAL_DICTIONARY_ENSEMBLE),
    ("Catch22Classifier", &BASIC_MOTIONS_CATCH22_CLASSIFIER),
    ("RandomIntervalClassifier", &BASIC_MOTIONS_RANDOM_INTERVAL_CLASSIFIER),
    ("SignatureClassifier", &BASIC_MOTIONS_SIGNATURE_CLASSIFIER),
    ("SummaryClassifier", &BASIC_MOTIONS_SUMMARY_CLASSIFIER),
    ("HIVECOTEV2", &BASIC_MOTIONS_HIVECOTEV2),
    ("CanonicalIntervalForest", &BASIC_MOTIONS_CANONICAL_INTERVAL_FOREST),
    ("DrCIF", &BASIC_MOTIONS_DR_CIF),
    ("Arsenal", &BASIC_MOTIONS_ARSENAL),
    ("RocketClassifier", &BASIC_MOTIONS_ROCKET_CLASSIFIER),
    ("ShapeletTransformClassifier", &BASIC_MOTIONS_SHAPELET_TRANSFORM_CLASSIFIER),
];

/// Expected unit-test probabilities for the classifier called `name`.
pub fn unit_test_proba(name: &str) -> Option<&'static UnitTestProba> {
    UNIT_TEST_TABLE
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, proba)| *proba)
}

/// Expected basic motions probabilities for the classifier called `name`.
pub fn basic_motions_proba(name: &str) -> Option<&'static BasicMotionsProba> {
    BASIC_MOTIONS_TABLE
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, proba)| *proba)
}

/// Classifiers with unit-test expectations.
pub fn unit_test_names() -> impl Iterator<Item = &'static str> {
    UNIT_TEST_TABLE.iter().map(|(key, _)| *key)
}

/// Classifiers with basic motions expectations.
pub fn basic_motions_names() -> impl Iterator<Item = &'static str> {
    BASIC_MOTIONS_TABLE.iter().map(|(key, _)| *key)
}
